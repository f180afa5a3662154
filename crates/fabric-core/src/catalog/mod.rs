//! Resource type descriptors
//!
//! Every resource kind the engine manages is described by one static
//! [`ResourceDescriptor`]: where its collection lives, which fields identify
//! an entry, and how a declaration becomes a create payload. The engine is
//! generic over these tables and never branches on the kind itself.
//!
//! ## Usage
//!
//! ```rust
//! use fabric_core::catalog::ResourceKind;
//!
//! let kind: ResourceKind = "ip-pools".parse().unwrap();
//! let descriptor = kind.descriptor();
//! assert_eq!(descriptor.collection_path, "resources/ip-pools");
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Resource kinds managed by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    /// IPv4 address pools
    IpPools,
    /// IPv6 address pools
    Ipv6Pools,
    /// ASN pools
    AsnPools,
    /// VLAN pools
    VlanPools,
    /// VNI pools
    VniPools,
    /// External routers
    ExternalRouters,
    /// Logical devices
    LogicalDevices,
    /// Interface maps
    InterfaceMaps,
    /// Rack types
    RackTypes,
    /// Fabric templates
    Templates,
    /// Blueprints
    Blueprints,
}

impl ResourceKind {
    /// All kinds, in catalog order
    pub const ALL: [ResourceKind; 11] = [
        ResourceKind::IpPools,
        ResourceKind::Ipv6Pools,
        ResourceKind::AsnPools,
        ResourceKind::VlanPools,
        ResourceKind::VniPools,
        ResourceKind::ExternalRouters,
        ResourceKind::LogicalDevices,
        ResourceKind::InterfaceMaps,
        ResourceKind::RackTypes,
        ResourceKind::Templates,
        ResourceKind::Blueprints,
    ];

    /// Wire name of the kind (e.g. `ip-pools`)
    pub fn as_str(&self) -> &'static str {
        self.descriptor().name
    }

    /// The static descriptor for this kind
    pub fn descriptor(&self) -> &'static ResourceDescriptor {
        match self {
            ResourceKind::IpPools => &IP_POOLS,
            ResourceKind::Ipv6Pools => &IPV6_POOLS,
            ResourceKind::AsnPools => &ASN_POOLS,
            ResourceKind::VlanPools => &VLAN_POOLS,
            ResourceKind::VniPools => &VNI_POOLS,
            ResourceKind::ExternalRouters => &EXTERNAL_ROUTERS,
            ResourceKind::LogicalDevices => &LOGICAL_DEVICES,
            ResourceKind::InterfaceMaps => &INTERFACE_MAPS,
            ResourceKind::RackTypes => &RACK_TYPES,
            ResourceKind::Templates => &TEMPLATES,
            ResourceKind::Blueprints => &BLUEPRINTS,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| crate::Error::config(format!("Unknown resource kind: {}", s)))
    }
}

/// A dotted path into a JSON object, one segment per nesting level
pub type FieldPath = &'static [&'static str];

/// Resolve a path inside a JSON value
///
/// Returns `None` when any segment is missing or a non-object is traversed.
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |current, segment| current.get(*segment))
}

/// Render a path for diagnostics (`design_template.display_name`)
pub fn display_path(path: &[&str]) -> String {
    path.join(".")
}

/// One component of a kind's identity
///
/// The declared value is read at `declared`; remote entries are compared at
/// `remote`. For most kinds both paths are the same single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityKey {
    /// Location of the value in the caller's declaration
    pub declared: FieldPath,
    /// Location of the value on a remote inventory entry
    pub remote: FieldPath,
}

impl IdentityKey {
    const fn same(path: FieldPath) -> Self {
        Self {
            declared: path,
            remote: path,
        }
    }
}

/// How a declared value is reshaped for the create payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    /// Passed through unchanged, including nested structure
    AsIs,
    /// Each element of a list is wrapped as a single-key record `{key: element}`
    WrapEach(&'static str),
}

/// What to emit when the caller did not declare a payload field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    /// Leave the field out of the payload
    Omit,
    /// Emit an empty list
    EmptyList,
}

/// One field of a kind's create contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadField {
    /// Field name on the wire
    pub name: &'static str,
    /// Location of the value in the caller's declaration
    pub source: FieldPath,
    /// Reshaping applied to the value
    pub shape: FieldShape,
    /// Behavior when the value is not declared
    pub missing: Missing,
}

impl PayloadField {
    const fn copy(name: &'static str, source: FieldPath) -> Self {
        Self {
            name,
            source,
            shape: FieldShape::AsIs,
            missing: Missing::Omit,
        }
    }

    const fn wrap_each(name: &'static str, source: FieldPath, key: &'static str) -> Self {
        Self {
            name,
            source,
            shape: FieldShape::WrapEach(key),
            missing: Missing::Omit,
        }
    }

    const fn list_or_empty(name: &'static str, source: FieldPath) -> Self {
        Self {
            name,
            source,
            shape: FieldShape::AsIs,
            missing: Missing::EmptyList,
        }
    }
}

/// Static per-kind configuration driving the generic engine
#[derive(Debug, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// Wire name of the kind
    pub name: &'static str,
    /// Human-readable label used in outcome messages
    pub label: &'static str,
    /// Remote collection path
    pub collection_path: &'static str,
    /// Identity components; all must match for an entry to be "the same"
    pub identity: &'static [IdentityKey],
    /// Fields of the create contract, in payload order
    pub payload: &'static [PayloadField],
    /// Reserved: existing entries are never updated
    pub supports_update: bool,
}

impl ResourceDescriptor {
    /// Path of a single remote record in this collection
    pub fn record_path(&self, remote_id: &str) -> String {
        format!("{}/{}", self.collection_path, remote_id)
    }

    /// Message reported when deleting something that is not there
    pub fn absent_message(&self) -> String {
        format!("{} does not exist, exiting", self.label)
    }
}

const DISPLAY_NAME: FieldPath = &["display_name"];
const LABEL: FieldPath = &["label"];
const ID: FieldPath = &["id"];
const TAGS: FieldPath = &["tags"];

const BY_DISPLAY_NAME: &[IdentityKey] = &[IdentityKey::same(DISPLAY_NAME)];
const BY_LABEL: &[IdentityKey] = &[IdentityKey::same(LABEL)];

const SUBNET_POOL_PAYLOAD: &[PayloadField] = &[
    PayloadField::copy("display_name", DISPLAY_NAME),
    PayloadField::wrap_each("subnets", &["subnets"], "network"),
    PayloadField::list_or_empty("tags", TAGS),
];

const RANGE_POOL_PAYLOAD: &[PayloadField] = &[
    PayloadField::copy("display_name", DISPLAY_NAME),
    PayloadField::copy("ranges", &["ranges"]),
    PayloadField::list_or_empty("tags", TAGS),
];

static IP_POOLS: ResourceDescriptor = ResourceDescriptor {
    name: "ip-pools",
    label: "IP Pool",
    collection_path: "resources/ip-pools",
    identity: BY_DISPLAY_NAME,
    payload: SUBNET_POOL_PAYLOAD,
    supports_update: false,
};

static IPV6_POOLS: ResourceDescriptor = ResourceDescriptor {
    name: "ipv6-pools",
    label: "IPv6 Pool",
    collection_path: "resources/ipv6-pools",
    identity: BY_DISPLAY_NAME,
    payload: SUBNET_POOL_PAYLOAD,
    supports_update: false,
};

static ASN_POOLS: ResourceDescriptor = ResourceDescriptor {
    name: "asn-pools",
    label: "ASN Pool",
    collection_path: "resources/asn-pools",
    identity: BY_DISPLAY_NAME,
    payload: RANGE_POOL_PAYLOAD,
    supports_update: false,
};

static VLAN_POOLS: ResourceDescriptor = ResourceDescriptor {
    name: "vlan-pools",
    label: "VLAN Pool",
    collection_path: "resources/vlan-pools",
    identity: BY_DISPLAY_NAME,
    payload: RANGE_POOL_PAYLOAD,
    supports_update: false,
};

static VNI_POOLS: ResourceDescriptor = ResourceDescriptor {
    name: "vni-pools",
    label: "VNI Pool",
    collection_path: "resources/vni-pools",
    identity: BY_DISPLAY_NAME,
    payload: RANGE_POOL_PAYLOAD,
    supports_update: false,
};

static EXTERNAL_ROUTERS: ResourceDescriptor = ResourceDescriptor {
    name: "external-routers",
    label: "External Router",
    collection_path: "resources/external-routers",
    identity: BY_DISPLAY_NAME,
    payload: &[
        PayloadField::copy("display_name", DISPLAY_NAME),
        PayloadField::copy("asn", &["asn"]),
        PayloadField::copy("address", &["address"]),
        PayloadField::copy("ipv6_address", &["ipv6_address"]),
    ],
    supports_update: false,
};

static LOGICAL_DEVICES: ResourceDescriptor = ResourceDescriptor {
    name: "logical-devices",
    label: "Logical Device",
    collection_path: "design/logical-devices",
    identity: BY_DISPLAY_NAME,
    payload: &[
        PayloadField::copy("display_name", DISPLAY_NAME),
        PayloadField::copy("panels", &["panels"]),
    ],
    supports_update: false,
};

static INTERFACE_MAPS: ResourceDescriptor = ResourceDescriptor {
    name: "interface-maps",
    label: "Interface Map",
    collection_path: "design/interface-maps",
    identity: BY_LABEL,
    payload: &[
        PayloadField::copy("label", LABEL),
        PayloadField::copy("device_profile_id", &["device_profile_id"]),
        PayloadField::copy("logical_device_id", &["logical_device_id"]),
        PayloadField::copy("interfaces", &["interfaces"]),
    ],
    supports_update: false,
};

static RACK_TYPES: ResourceDescriptor = ResourceDescriptor {
    name: "rack-types",
    label: "Rack Type",
    collection_path: "design/rack-types",
    identity: &[IdentityKey::same(ID)],
    payload: &[
        PayloadField::copy("id", ID),
        PayloadField::copy("display_name", DISPLAY_NAME),
        PayloadField::copy("description", &["description"]),
        PayloadField::copy("leafs", &["leafs"]),
        PayloadField::copy("access_switches", &["access_switches"]),
        PayloadField::copy("servers", &["servers"]),
        PayloadField::copy("logical_devices", &["logical_devices"]),
    ],
    supports_update: false,
};

static TEMPLATES: ResourceDescriptor = ResourceDescriptor {
    name: "templates",
    label: "Template",
    collection_path: "design/templates",
    identity: &[IdentityKey {
        declared: &["design_template", "display_name"],
        remote: DISPLAY_NAME,
    }],
    payload: &[
        PayloadField::copy("display_name", &["design_template", "display_name"]),
        PayloadField::copy("type", &["design_template", "type"]),
        PayloadField::copy("spine", &["design_template", "spine"]),
        PayloadField::copy("rack_types", &["design_template", "rack_types"]),
        PayloadField::copy("rack_type_counts", &["design_template", "rack_type_counts"]),
        PayloadField::copy(
            "asn_allocation_policy",
            &["design_template", "asn_allocation_policy"],
        ),
        PayloadField::copy(
            "fabric_addressing_policy",
            &["design_template", "fabric_addressing_policy"],
        ),
        PayloadField::copy(
            "external_routing_policy",
            &["design_template", "external_routing_policy"],
        ),
        PayloadField::copy(
            "virtual_network_policy",
            &["design_template", "virtual_network_policy"],
        ),
        PayloadField::copy(
            "dhcp_service_intent",
            &["design_template", "dhcp_service_intent"],
        ),
    ],
    supports_update: false,
};

static BLUEPRINTS: ResourceDescriptor = ResourceDescriptor {
    name: "blueprints",
    label: "Blueprint",
    collection_path: "blueprints",
    identity: BY_LABEL,
    payload: &[
        PayloadField::copy("label", LABEL),
        PayloadField::copy("design", &["design"]),
        PayloadField::copy("init_type", &["init_type"]),
        PayloadField::copy("template_id", &["template_id"]),
    ],
    supports_update: false,
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_names_round_trip_through_from_str() {
        for kind in ResourceKind::ALL {
            let parsed: ResourceKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_serde_names_match_descriptor_names() {
        for kind in ResourceKind::ALL {
            let wire = serde_json::to_value(kind).unwrap();
            assert_eq!(wire, json!(kind.as_str()));
        }
    }

    #[test]
    fn test_unknown_kind_is_config_error() {
        let err = "spine-pools".parse::<ResourceKind>().unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_no_descriptor_supports_update() {
        assert!(ResourceKind::ALL
            .iter()
            .all(|kind| !kind.descriptor().supports_update));
    }

    #[test]
    fn test_every_descriptor_has_identity_and_payload() {
        for kind in ResourceKind::ALL {
            let descriptor = kind.descriptor();
            assert!(!descriptor.identity.is_empty(), "{} has no identity", kind);
            assert!(!descriptor.payload.is_empty(), "{} has no payload", kind);
        }
    }

    #[test]
    fn test_collection_paths() {
        assert_eq!(
            ResourceKind::RackTypes.descriptor().collection_path,
            "design/rack-types"
        );
        assert_eq!(ResourceKind::Blueprints.descriptor().collection_path, "blueprints");
        assert_eq!(
            ResourceKind::ExternalRouters.descriptor().record_path("abc"),
            "resources/external-routers/abc"
        );
    }

    #[test]
    fn test_absent_message() {
        assert_eq!(
            ResourceKind::IpPools.descriptor().absent_message(),
            "IP Pool does not exist, exiting"
        );
    }

    #[test]
    fn test_lookup_nested_paths() {
        let value = json!({"design_template": {"display_name": "L2", "type": "rack_based"}});

        assert_eq!(
            lookup(&value, &["design_template", "display_name"]),
            Some(&json!("L2"))
        );
        assert_eq!(lookup(&value, &["design_template", "spine"]), None);
        assert_eq!(lookup(&json!("scalar"), &["display_name"]), None);
        assert_eq!(display_path(&["design_template", "type"]), "design_template.type");
    }
}
