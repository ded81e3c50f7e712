use serde::{Deserialize, Serialize};

/// OSPF process id used for every generated process and interface binding
pub const OSPF_PROCESS_ID: u32 = 1;

/// Backbone area assigned to interface-level OSPF bindings
pub const BACKBONE_AREA: &str = "0.0.0.0";

/// Router id used when the form leaves the OSPF router id empty
pub const DEFAULT_ROUTER_ID: &str = "0.0.0.0";

/// Canonical device type values submitted by the form
pub mod device_types {
    pub const CORE: &str = "Core";
    pub const PE: &str = "PE";
}

/// DeviceDocument is the full replacement document produced for one form
/// submission, uniquely identified by its hostname. Sections left empty by
/// the submission are omitted, never written as empty containers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceDocument {
    pub hostname: String,
    pub device_type: String, // Core, PE, or free-form
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlans: Option<Vec<Vlan>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interfaces: Option<Vec<Interface>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_routes: Option<Vec<StaticRoute>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ospf: Option<Ospf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rip: Option<Rip>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bgp: Option<Bgp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhcp: Option<Dhcp>,
}

/// Role-specific document sections. Each role owns exactly the protocol
/// sections it is allowed to carry, so invalid combinations (RIP on a PE,
/// BGP on a Core) cannot be built.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceRole {
    Generic,
    Core {
        interfaces: Vec<RoutedInterface>,
        ospf: Ospf,
        rip: Rip,
    },
    Pe {
        interfaces: Vec<RoutedInterface>,
        ospf: Ospf,
        bgp: Bgp,
    },
}

/// VLAN definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vlan {
    pub id: String,
    pub name: String,
}

/// Interface entries come in two shapes: switched ports from the generic
/// form section and routed ports from the Core/PE sections. When any
/// role-specific rows are submitted they replace the switched list entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Interface {
    Switched(SwitchedInterface),
    Routed(RoutedInterface),
}

/// Switched interface from the generic form section. The mode is always
/// recorded, even when submitted empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchedInterface {
    pub name: String,
    pub mode: String, // access, trunk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan: Option<String>,
}

/// Routed interface from the Core/PE form sections. The DHCP server flags
/// are only ever written as true; an unchecked flag is omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutedInterface {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ospf: Option<InterfaceOspf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhcp_server_v4: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhcp_server_v6: Option<bool>,
}

/// Interface-level OSPF binding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceOspf {
    pub process_id: u32,
    pub area: String,
}

impl InterfaceOspf {
    /// Binding into the backbone area under the fixed process id
    pub fn backbone() -> Self {
        Self {
            process_id: OSPF_PROCESS_ID,
            area: BACKBONE_AREA.to_string(),
        }
    }
}

/// Static route; IPv4 routes always precede IPv6 routes in the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticRoute {
    pub prefix: String,
    pub next_hop: String,
}

/// OSPF process section. The network list is kept even when empty so
/// templates can iterate it unconditionally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ospf {
    pub process_id: u32,
    pub router_id: String,
    pub networks: Vec<OspfNetwork>,
}

/// Network statement within an OSPF process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OspfNetwork {
    pub prefix: String,
    pub area: String,
}

/// RIP section; the network list is kept even when empty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rip {
    pub networks: Vec<String>,
}

/// BGP section for provider-edge devices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bgp {
    pub local_as: String,
    pub neighbors: Vec<BgpNeighbor>,
}

/// BGP neighbor; activate_ipv6 reflects whether the submitted activation
/// flag was exactly "1"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BgpNeighbor {
    pub ip: String,
    pub remote_as: String,
    pub activate_ipv6: bool,
}

/// DHCP server section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dhcp {
    pub subnets: Vec<DhcpSubnet>,
}

/// One served subnet; range and gateway are optional per row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DhcpSubnet {
    pub prefix: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<AddressRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
}

/// Address pool boundaries for a DHCP subnet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressRange {
    pub start: String,
    pub end: String,
}

impl AddressRange {
    /// Split a `start-end` form value. Without a dash the whole trimmed
    /// value becomes the start and the end is left empty.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once('-') {
            Some((start, end)) => Self {
                start: start.trim().to_string(),
                end: end.trim().to_string(),
            },
            None => Self {
                start: raw.trim().to_string(),
                end: String::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_range_parse() {
        assert_eq!(
            AddressRange::parse("10.0.0.10-10.0.0.20"),
            AddressRange {
                start: "10.0.0.10".to_string(),
                end: "10.0.0.20".to_string(),
            }
        );
        assert_eq!(
            AddressRange::parse(" 10.0.0.10 - 10.0.0.20 "),
            AddressRange {
                start: "10.0.0.10".to_string(),
                end: "10.0.0.20".to_string(),
            }
        );
        assert_eq!(
            AddressRange::parse("10.0.0.10"),
            AddressRange {
                start: "10.0.0.10".to_string(),
                end: String::new(),
            }
        );
    }

    #[test]
    fn test_interface_shapes_round_trip() {
        let interfaces = vec![
            Interface::Switched(SwitchedInterface {
                name: "Ethernet1".to_string(),
                mode: "access".to_string(),
                ipv4: None,
                ipv6: None,
                vlan: Some("10".to_string()),
            }),
            Interface::Routed(RoutedInterface {
                name: "Ethernet2".to_string(),
                ipv4: Some("10.0.12.1/24".to_string()),
                ipv6: None,
                ospf: Some(InterfaceOspf::backbone()),
                dhcp_server_v4: Some(true),
                dhcp_server_v6: None,
            }),
        ];

        let yaml = serde_yaml::to_string(&interfaces).unwrap();
        let parsed: Vec<Interface> = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, interfaces);
    }

    #[test]
    fn test_empty_sections_omitted_from_yaml() {
        let document = DeviceDocument {
            hostname: "S1".to_string(),
            device_type: "Switch".to_string(),
            vlans: None,
            interfaces: None,
            static_routes: None,
            ospf: None,
            rip: None,
            bgp: None,
            dhcp: None,
        };

        let yaml = serde_yaml::to_string(&document).unwrap();
        assert!(yaml.contains("hostname: S1"));
        assert!(!yaml.contains("vlans"));
        assert!(!yaml.contains("static_routes"));
        assert!(!yaml.contains("bgp"));
    }

    #[test]
    fn test_protocol_network_lists_serialize_when_empty() {
        let ospf = Ospf {
            process_id: OSPF_PROCESS_ID,
            router_id: DEFAULT_ROUTER_ID.to_string(),
            networks: Vec::new(),
        };
        let yaml = serde_yaml::to_string(&ospf).unwrap();
        assert!(yaml.contains("networks: []"));

        let rip = Rip {
            networks: Vec::new(),
        };
        let yaml = serde_yaml::to_string(&rip).unwrap();
        assert!(yaml.contains("networks: []"));
    }
}
