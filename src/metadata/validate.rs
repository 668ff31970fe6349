use std::net::{Ipv4Addr, Ipv6Addr};

use url::{Host, Url};

use super::error::{BlockReason, MetadataError};

const INTERNAL_PREFIXES: &[&str] = &["metadata.", "169.254."];
const INTERNAL_SUFFIXES: &[&str] = &[".local", ".internal", ".intranet"];

/// Parse `input` and decide whether it is safe to fetch.
///
/// Only the textual host is inspected. No DNS lookup happens here, so a
/// public name that resolves to a private address still passes.
pub fn validate_url(input: &str) -> Result<Url, MetadataError> {
    let parsed = Url::parse(input).map_err(|_| MetadataError::InvalidUrl)?;
    check_url(&parsed)?;
    Ok(parsed)
}

/// Scheme and host checks on an already parsed URL. Also applied to every
/// redirect hop by the fetcher.
pub fn check_url(url: &Url) -> Result<(), MetadataError> {
    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(MetadataError::DisallowedScheme),
    }

    match url.host() {
        None => Err(MetadataError::InvalidUrl),
        Some(Host::Ipv4(ip)) => check_ipv4(ip),
        Some(Host::Ipv6(ip)) => check_ipv6(ip),
        Some(Host::Domain(name)) => check_domain(name),
    }
}

fn check_ipv4(ip: Ipv4Addr) -> Result<(), MetadataError> {
    if ip == Ipv4Addr::LOCALHOST {
        return Err(MetadataError::BlockedHost(BlockReason::Localhost));
    }
    if is_blocked_ipv4(ip) {
        return Err(MetadataError::BlockedHost(BlockReason::PrivateIp));
    }
    Ok(())
}

fn check_ipv6(ip: Ipv6Addr) -> Result<(), MetadataError> {
    if ip.is_loopback() {
        return Err(MetadataError::BlockedHost(BlockReason::Localhost));
    }
    Ok(())
}

fn check_domain(name: &str) -> Result<(), MetadataError> {
    let host = name.trim_end_matches('.').to_ascii_lowercase();

    if host == "localhost" {
        return Err(MetadataError::BlockedHost(BlockReason::Localhost));
    }

    let internal = INTERNAL_PREFIXES.iter().any(|p| host.starts_with(p))
        || INTERNAL_SUFFIXES.iter().any(|s| host.ends_with(s));
    if internal {
        return Err(MetadataError::BlockedHost(BlockReason::InternalDomain));
    }
    Ok(())
}

/// Private, loopback, link-local, "this network", and everything from the
/// multicast block upwards.
pub fn is_blocked_ipv4(ip: Ipv4Addr) -> bool {
    let o = ip.octets();
    matches!(o, [10, ..] | [127, ..] | [169, 254, ..] | [192, 168, ..] | [0, ..])
        || (o[0] == 172 && (16..=31).contains(&o[1]))
        || o[0] >= 224
}
