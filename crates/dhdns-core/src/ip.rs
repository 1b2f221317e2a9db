//! IP address classification
//!
//! Decides whether an address reported by an IP source may be published in
//! DNS. Only [`IpClass::Public`] addresses are accepted.
//!
//! IPv4 table (most specific prefix wins):
//!
//! | prefix            | class               |
//! |-------------------|---------------------|
//! | `0.0.0.0/8`       | Private             |
//! | `10.0.0.0/8`      | Private             |
//! | `100.64.0.0/10`   | CarrierGradeNat     |
//! | `127.0.0.0/8`     | Loopback            |
//! | `169.254.0.0/16`  | LinkLocal           |
//! | `172.16.0.0/12`   | Private             |
//! | `192.168.0.0/16`  | Private             |
//! | `224.0.0.0/3`     | Reserved            |
//! | everything else   | Public              |

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Classification of an IP address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpClass {
    /// Globally routable
    Public,
    /// RFC 1918 / unique local / "this network"
    Private,
    /// Shared address space used by carrier-grade NAT
    CarrierGradeNat,
    /// Loopback
    Loopback,
    /// Link-local
    LinkLocal,
    /// The unspecified address (`::`)
    Unspecified,
    /// Multicast, broadcast and other reserved ranges
    Reserved,
}

impl IpClass {
    pub fn is_public(&self) -> bool {
        matches!(self, IpClass::Public)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IpClass::Public => "PUBLIC",
            IpClass::Private => "PRIVATE",
            IpClass::CarrierGradeNat => "CARRIER_GRADE_NAT",
            IpClass::Loopback => "LOOPBACK",
            IpClass::LinkLocal => "LINKLOCAL",
            IpClass::Unspecified => "UNSPECIFIED",
            IpClass::Reserved => "RESERVED",
        }
    }
}

impl fmt::Display for IpClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify any IP address
pub fn classify(ip: &IpAddr) -> IpClass {
    match ip {
        IpAddr::V4(v4) => classify_v4(v4),
        IpAddr::V6(v6) => classify_v6(v6),
    }
}

/// Classify an IPv4 address
pub fn classify_v4(ip: &Ipv4Addr) -> IpClass {
    let [a, b, _, _] = ip.octets();
    match (a, b) {
        (0, _) | (10, _) => IpClass::Private,
        (100, 64..=127) => IpClass::CarrierGradeNat,
        (127, _) => IpClass::Loopback,
        (169, 254) => IpClass::LinkLocal,
        (172, 16..=31) => IpClass::Private,
        (192, 168) => IpClass::Private,
        (224..=255, _) => IpClass::Reserved,
        _ => IpClass::Public,
    }
}

/// Classify an IPv6 address
///
/// IPv4-mapped addresses (`::ffff:a.b.c.d`) are classified by their IPv4 part.
pub fn classify_v6(ip: &Ipv6Addr) -> IpClass {
    if let Some(v4) = ip.to_ipv4_mapped() {
        return classify_v4(&v4);
    }
    if ip.is_unspecified() {
        return IpClass::Unspecified;
    }
    if ip.is_loopback() {
        return IpClass::Loopback;
    }

    let first = ip.segments()[0];
    if first & 0xffc0 == 0xfe80 {
        IpClass::LinkLocal
    } else if first & 0xfe00 == 0xfc00 {
        IpClass::Private
    } else if first & 0xe000 == 0x2000 {
        IpClass::Public
    } else {
        IpClass::Reserved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class_of(ip: &str) -> IpClass {
        classify(&ip.parse().unwrap())
    }

    #[test]
    fn private_ranges() {
        assert_eq!(class_of("10.1.2.3"), IpClass::Private);
        assert_eq!(class_of("172.16.0.1"), IpClass::Private);
        assert_eq!(class_of("172.31.255.255"), IpClass::Private);
        assert_eq!(class_of("192.168.1.1"), IpClass::Private);
        assert_eq!(class_of("0.0.0.0"), IpClass::Private);
    }

    #[test]
    fn range_edges_stay_public() {
        assert_eq!(class_of("172.15.255.255"), IpClass::Public);
        assert_eq!(class_of("172.32.0.0"), IpClass::Public);
        assert_eq!(class_of("100.63.255.255"), IpClass::Public);
        assert_eq!(class_of("100.128.0.0"), IpClass::Public);
        assert_eq!(class_of("223.255.255.255"), IpClass::Public);
    }

    #[test]
    fn special_purpose_ranges() {
        assert_eq!(class_of("127.0.0.1"), IpClass::Loopback);
        assert_eq!(class_of("169.254.10.20"), IpClass::LinkLocal);
        assert_eq!(class_of("100.64.0.1"), IpClass::CarrierGradeNat);
        assert_eq!(class_of("224.0.0.1"), IpClass::Reserved);
        assert_eq!(class_of("255.255.255.255"), IpClass::Reserved);
    }

    #[test]
    fn documentation_ranges_count_as_public() {
        assert!(class_of("203.0.113.5").is_public());
        assert!(class_of("198.51.100.9").is_public());
        assert!(class_of("8.8.8.8").is_public());
    }

    #[test]
    fn ipv6_classes() {
        assert_eq!(class_of("::"), IpClass::Unspecified);
        assert_eq!(class_of("::1"), IpClass::Loopback);
        assert_eq!(class_of("fe80::1"), IpClass::LinkLocal);
        assert_eq!(class_of("fd00::1"), IpClass::Private);
        assert_eq!(class_of("ff02::1"), IpClass::Reserved);
        assert_eq!(class_of("2606:4700::1111"), IpClass::Public);
    }

    #[test]
    fn mapped_ipv4_uses_ipv4_table() {
        assert_eq!(class_of("::ffff:192.168.1.1"), IpClass::Private);
        assert_eq!(class_of("::ffff:203.0.113.5"), IpClass::Public);
    }
}
