//! Assembly of a device document from submitted form fields.

use super::{FormData, GroupSchema};
use crate::models::*;

const VLANS: GroupSchema = GroupSchema {
    group: "vlans",
    members: &["id", "name"],
    required: &["id", "name"],
};

const INTERFACES: GroupSchema = GroupSchema {
    group: "interfaces",
    members: &["name", "ipv4", "ipv6", "mode", "vlan"],
    required: &["name"],
};

const IPV4_ROUTES: GroupSchema = GroupSchema {
    group: "ipv4_routes",
    members: &["prefix", "next_hop"],
    required: &["prefix", "next_hop"],
};

const IPV6_ROUTES: GroupSchema = GroupSchema {
    group: "ipv6_routes",
    members: &["prefix", "next_hop"],
    required: &["prefix", "next_hop"],
};

const OSPF_NETWORKS: GroupSchema = GroupSchema {
    group: "ospf_networks",
    members: &["prefix", "area"],
    required: &["prefix", "area"],
};

const CORE_INTERFACES: GroupSchema = GroupSchema {
    group: "core_interfaces",
    members: &["name", "ipv4", "ipv6", "ospf", "dhcp_v4", "dhcp_v6"],
    required: &["name"],
};

const PE_INTERFACES: GroupSchema = GroupSchema {
    group: "pe_interfaces",
    members: &["name", "ipv4", "ipv6", "ospf"],
    required: &["name"],
};

const BGP_NEIGHBORS: GroupSchema = GroupSchema {
    group: "bgp_neighbors",
    members: &["ip", "remote_as", "activate_ipv6"],
    required: &["ip", "remote_as"],
};

const DHCP_SUBNETS: GroupSchema = GroupSchema {
    group: "dhcp_subnets",
    members: &["prefix", "range", "gateway"],
    required: &["prefix"],
};

/// Assemble a complete device document from the flat form mapping.
///
/// Pure and deterministic: identical input yields an identical document.
/// Repeated groups zip positionally and truncate to the shortest submitted
/// column, and rows missing required members are dropped; both are accepted
/// lossy behavior, not errors. Missing fields read as empty, so the
/// function has no failure condition of its own.
pub fn normalize(form: &FormData) -> DeviceDocument {
    let device_type = form.first("device_type").to_string();

    let mut document = DeviceDocument {
        hostname: form.first("hostname").to_string(),
        device_type: device_type.clone(),
        vlans: non_empty(vlans(form)),
        interfaces: non_empty(switched_interfaces(form)),
        static_routes: non_empty(static_routes(form)),
        ospf: None,
        rip: None,
        bgp: None,
        dhcp: dhcp(form),
    };

    // Role-specific interfaces replace the switched list entirely when any
    // rows were submitted; protocol sections attach unconditionally for
    // their role.
    match device_role(&device_type, form) {
        DeviceRole::Generic => {}
        DeviceRole::Core {
            interfaces,
            ospf,
            rip,
        } => {
            if !interfaces.is_empty() {
                document.interfaces = Some(interfaces.into_iter().map(Interface::Routed).collect());
            }
            document.ospf = Some(ospf);
            document.rip = Some(rip);
        }
        DeviceRole::Pe {
            interfaces,
            ospf,
            bgp,
        } => {
            if !interfaces.is_empty() {
                document.interfaces = Some(interfaces.into_iter().map(Interface::Routed).collect());
            }
            document.ospf = Some(ospf);
            document.bgp = Some(bgp);
        }
    }

    document
}

fn device_role(device_type: &str, form: &FormData) -> DeviceRole {
    match device_type {
        device_types::CORE => DeviceRole::Core {
            interfaces: routed_interfaces(form, &CORE_INTERFACES),
            ospf: ospf(form),
            rip: rip(form),
        },
        device_types::PE => DeviceRole::Pe {
            interfaces: routed_interfaces(form, &PE_INTERFACES),
            ospf: ospf(form),
            bgp: bgp(form),
        },
        _ => DeviceRole::Generic,
    }
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

fn vlans(form: &FormData) -> Vec<Vlan> {
    form.rows(&VLANS)
        .iter()
        .map(|row| Vlan {
            id: row.get("id").to_string(),
            name: row.get("name").to_string(),
        })
        .collect()
}

fn switched_interfaces(form: &FormData) -> Vec<Interface> {
    form.rows(&INTERFACES)
        .iter()
        .map(|row| {
            Interface::Switched(SwitchedInterface {
                name: row.get("name").to_string(),
                mode: row.get("mode").to_string(),
                ipv4: row.opt("ipv4"),
                ipv6: row.opt("ipv6"),
                vlan: row.opt("vlan"),
            })
        })
        .collect()
}

fn route_group(form: &FormData, schema: &'static GroupSchema) -> Vec<StaticRoute> {
    form.rows(schema)
        .iter()
        .map(|row| StaticRoute {
            prefix: row.get("prefix").to_string(),
            next_hop: row.get("next_hop").to_string(),
        })
        .collect()
}

// IPv4 routes always precede IPv6 routes, regardless of submission order.
fn static_routes(form: &FormData) -> Vec<StaticRoute> {
    let mut routes = route_group(form, &IPV4_ROUTES);
    routes.extend(route_group(form, &IPV6_ROUTES));
    routes
}

fn routed_interfaces(form: &FormData, schema: &'static GroupSchema) -> Vec<RoutedInterface> {
    form.rows(schema)
        .iter()
        .map(|row| RoutedInterface {
            name: row.get("name").to_string(),
            ipv4: row.opt("ipv4"),
            ipv6: row.opt("ipv6"),
            ospf: (row.get("ospf") == "yes").then(InterfaceOspf::backbone),
            dhcp_server_v4: (!row.get("dhcp_v4").is_empty()).then_some(true),
            dhcp_server_v6: (!row.get("dhcp_v6").is_empty()).then_some(true),
        })
        .collect()
}

fn ospf(form: &FormData) -> Ospf {
    let router_id = form.first("ospf_router_id");
    Ospf {
        process_id: OSPF_PROCESS_ID,
        router_id: if router_id.is_empty() {
            DEFAULT_ROUTER_ID.to_string()
        } else {
            router_id.to_string()
        },
        networks: form
            .rows(&OSPF_NETWORKS)
            .iter()
            .map(|row| OspfNetwork {
                prefix: row.get("prefix").to_string(),
                area: row.get("area").to_string(),
            })
            .collect(),
    }
}

fn rip(form: &FormData) -> Rip {
    Rip {
        networks: form.values("rip_networks[]").to_vec(),
    }
}

fn bgp(form: &FormData) -> Bgp {
    Bgp {
        local_as: form.first("bgp_local_as").to_string(),
        neighbors: form
            .rows(&BGP_NEIGHBORS)
            .iter()
            .map(|row| BgpNeighbor {
                ip: row.get("ip").to_string(),
                remote_as: row.get("remote_as").to_string(),
                activate_ipv6: row.get("activate_ipv6") == "1",
            })
            .collect(),
    }
}

fn dhcp(form: &FormData) -> Option<Dhcp> {
    let subnets: Vec<DhcpSubnet> = form
        .rows(&DHCP_SUBNETS)
        .iter()
        .map(|row| DhcpSubnet {
            prefix: row.get("prefix").to_string(),
            range: row.opt("range").map(|raw| AddressRange::parse(&raw)),
            gateway: row.opt("gateway"),
        })
        .collect();
    non_empty(subnets).map(|subnets| Dhcp { subnets })
}
