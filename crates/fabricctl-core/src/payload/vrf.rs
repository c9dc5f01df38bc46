use fabricctl_api::types::VrfPayload;
use indexmap::IndexMap;

use super::build_err;
use crate::error::CoreError;
use crate::loader::ReferenceTables;
use crate::model::VrfRecord;

pub const VRF_TEMPLATE: &str = "Default_VRF_Universal";
pub const VRF_EXTENSION_TEMPLATE: &str = "Default_VRF_Extension_Universal";

const SECTIONS: [&str; 2] = ["General Parameters", "Advanced"];

/// Fields derived from the record; defaults and overrides never replace them.
const IDENTITY_FIELDS: &[&str] = &["vrfName", "vrfSegmentId", "vrfVlanId"];

/// Template parameters every VRF carries unless the defaults say otherwise.
const BUILTIN_FIELDS: &[(&str, &str)] = &[
    ("mtu", "9216"),
    ("tag", "12345"),
    ("vrfRouteMap", "FABRIC-RMAP-REDIST-SUBNET"),
    ("maxBgpPaths", "1"),
    ("maxIbgpPaths", "2"),
    ("ipv6LinkLocalFlag", "true"),
    ("advertiseHostRouteFlag", "false"),
    ("advertiseDefaultRouteFlag", "true"),
    ("configureStaticDefaultRouteFlag", "true"),
    ("nveId", "1"),
];

pub fn vrf_payload(record: &VrfRecord, tables: &ReferenceTables) -> Result<VrfPayload, CoreError> {
    let mut config: IndexMap<String, String> = IndexMap::new();
    config.insert("vrfName".into(), record.name.clone());
    config.insert("vrfSegmentId".into(), record.vrf_id.to_string());
    config.insert("vrfVlanId".into(), record.vlan_id.to_string());
    config.insert(
        "vrfVlanName".into(),
        record.vlan_name.clone().unwrap_or_default(),
    );
    config.insert(
        "vrfIntfDescription".into(),
        record.interface_description.clone().unwrap_or_default(),
    );
    config.insert(
        "vrfDescription".into(),
        record.description.clone().unwrap_or_default(),
    );
    for (key, value) in BUILTIN_FIELDS {
        config.insert((*key).into(), (*value).into());
    }

    for section in SECTIONS {
        for (key, value) in tables.mapped_section(section) {
            if !IDENTITY_FIELDS.contains(&key.as_str()) {
                config.insert(key, value.to_string());
            }
        }
        if let Some(user) = record.overrides.get(section) {
            for (key, value) in user {
                let wire = tables.wire_name(section, key);
                if !IDENTITY_FIELDS.contains(&wire.as_str()) {
                    config.insert(wire, value.to_string());
                }
            }
        }
    }

    let vrf_template_config = serde_json::to_string(&config)
        .map_err(|e| build_err("vrfTemplateConfig", e.to_string()))?;

    Ok(VrfPayload {
        fabric: record.fabric.clone(),
        vrf_name: record.name.clone(),
        vrf_id: record.vrf_id,
        vrf_template: tables
            .default_str("vrfTemplate")
            .unwrap_or_else(|| VRF_TEMPLATE.into()),
        vrf_extension_template: tables
            .default_str("vrfExtensionTemplate")
            .unwrap_or_else(|| VRF_EXTENSION_TEMPLATE.into()),
        vrf_template_config,
        hierarchical_key: Some(record.fabric.clone()),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::Scalar;

    fn bluevrf() -> VrfRecord {
        VrfRecord {
            fabric: "Site1".into(),
            name: "bluevrf".into(),
            vrf_id: 50001,
            vlan_id: 2001,
            vlan_name: Some("blue".into()),
            interface_description: None,
            description: Some("tenant blue".into()),
            overrides: IndexMap::new(),
        }
    }

    fn template_config(payload: &VrfPayload) -> serde_json::Value {
        serde_json::from_str(&payload.vrf_template_config).unwrap()
    }

    #[test]
    fn template_config_is_a_json_string_with_identity() {
        let payload = vrf_payload(&bluevrf(), &ReferenceTables::empty("vrf")).unwrap();
        assert_eq!(payload.vrf_template, VRF_TEMPLATE);
        assert_eq!(payload.vrf_extension_template, VRF_EXTENSION_TEMPLATE);
        assert_eq!(payload.hierarchical_key.as_deref(), Some("Site1"));
        let config = template_config(&payload);
        assert_eq!(config["vrfName"], "bluevrf");
        assert_eq!(config["vrfSegmentId"], "50001");
        assert_eq!(config["vrfVlanId"], "2001");
        assert_eq!(config["vrfDescription"], "tenant blue");
        assert_eq!(config["mtu"], "9216");
    }

    #[test]
    fn defaults_then_overrides_are_mapped_but_never_replace_identity() {
        let tables = ReferenceTables::from_values(
            "vrf",
            serde_yaml::from_str(
                "vrfTemplate: Corp_VRF\nGeneral Parameters:\n  VRF Interface MTU: 9000\n  VLAN ID: 1\nAdvanced:\n  Route Target Both: true\n",
            )
            .unwrap(),
            serde_yaml::from_str(
                "General Parameters:\n  VRF Interface MTU: mtu\n  VLAN ID: vrfVlanId\nAdvanced:\n  Route Target Both: isRPExternal\n",
            )
            .unwrap(),
        );
        let mut vrf = bluevrf();
        vrf.overrides.insert(
            "Advanced".into(),
            IndexMap::from([("Route Target Both".to_owned(), Scalar::Bool(false))]),
        );
        let payload = vrf_payload(&vrf, &tables).unwrap();
        assert_eq!(payload.vrf_template, "Corp_VRF");
        let config = template_config(&payload);
        assert_eq!(config["mtu"], "9000");
        assert_eq!(config["vrfVlanId"], "2001");
        assert_eq!(config["isRPExternal"], "false");
    }
}
