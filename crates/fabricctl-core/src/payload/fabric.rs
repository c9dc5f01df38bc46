use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::build_err;
use crate::error::CoreError;
use crate::loader::ReferenceTables;
use crate::loader::merge::flatten_mapping;
use crate::model::{FabricRecord, FabricType, Scalar};

/// Keys the controller rejects on create/update.
pub const FABRIC_DENY_LIST: &[&str] = &[
    "USE_LINK_LOCAL",
    "ISIS_OVERLOAD_ENABLE",
    "ISIS_P2P_ENABLE",
    "PNP_ENABLE_INTERNAL",
    "DOMAIN_NAME_INTERNAL",
];

/// Template selectors that live in the defaults but are not fabric fields.
const TEMPLATE_KEYS: &[&str] = &[
    "vrfTemplate",
    "networkTemplate",
    "vrfExtensionTemplate",
    "networkExtensionTemplate",
];

/// Fabric create/update body plus the template it targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FabricPayload {
    pub name: String,
    pub template: &'static str,
    pub nv_pairs: IndexMap<String, String>,
}

impl FabricPayload {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.nv_pairs.get(key).map(String::as_str)
    }

    /// JSON object sent to `POST/PUT control/fabrics/{f}/{template}`.
    pub fn body(&self) -> Value {
        Value::Object(
            self.nv_pairs
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect::<Map<_, _>>(),
        )
    }
}

/// Freeform file references are resolved by the loader, never sent as fields.
fn is_freeform_reference(value: &Scalar) -> bool {
    matches!(value, Scalar::Str(s) if s.contains(".sh") || s.contains("Banner"))
}

pub fn fabric_payload(
    record: &FabricRecord,
    tables: &ReferenceTables,
) -> Result<FabricPayload, CoreError> {
    if record.name.trim().is_empty() {
        return Err(build_err("FABRIC_NAME", "must not be empty"));
    }
    let mapping = flatten_mapping(&tables.mapping);

    let mut nv = IndexMap::new();
    for (key, value) in &record.properties {
        if is_freeform_reference(value) {
            continue;
        }
        match mapping.get(key) {
            Some(Some(wire)) => {
                nv.insert(wire.clone(), value.to_string());
            }
            Some(None) => {}
            None => {
                nv.insert(key.clone(), value.to_string());
            }
        }
    }

    for key in TEMPLATE_KEYS {
        nv.shift_remove(*key);
    }
    nv.insert("FABRIC_NAME".into(), record.name.clone());
    if let Some(asn) = nv.get("BGP_AS").cloned() {
        nv.insert("SITE_ID".into(), asn);
    }

    let ff = &record.freeform;
    match record.fabric_type {
        FabricType::VxlanEvpn => {
            let blocks = [
                ("AAA_SERVER_CONF", &ff.aaa),
                ("EXTRA_CONF_LEAF", &ff.leaf),
                ("EXTRA_CONF_SPINE", &ff.spine),
                ("INTRA_FABRIC_LINK_FREEFORM", &ff.intra_links),
            ];
            for (key, text) in blocks {
                if let Some(text) = text {
                    nv.insert(key.into(), text.clone());
                }
            }
            if let Some(banner) = &ff.banner {
                nv.insert("BANNER".into(), format!("`{banner}`"));
            }
        }
        FabricType::MultiSiteDomain => {
            nv.insert("FABRIC_TYPE".into(), "MFD".into());
            nv.insert("FF".into(), "MSD".into());
        }
        FabricType::InterSiteNetwork => {
            nv.shift_remove("SITE_ID");
            nv.insert("FABRIC_TYPE".into(), "External".into());
            nv.insert("EXT_FABRIC_TYPE".into(), "Multi-Site External Network".into());
            if let Some(text) = &ff.fabric {
                nv.insert("FABRIC_FREEFORM".into(), text.clone());
            }
            if let Some(text) = &ff.aaa {
                nv.insert("AAA_FREEFORM".into(), text.clone());
            }
        }
    }

    for key in FABRIC_DENY_LIST {
        nv.shift_remove(*key);
    }

    Ok(FabricPayload {
        name: record.name.clone(),
        template: record.fabric_type.template(),
        nv_pairs: nv,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeSet;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::loader::merge::{deep_merge, flatten};
    use crate::model::FabricFreeform;

    fn tables(defaults: &str, mapping: &str) -> ReferenceTables {
        ReferenceTables::from_values(
            "cisco_vxlan",
            serde_yaml::from_str(defaults).unwrap(),
            serde_yaml::from_str(mapping).unwrap(),
        )
    }

    fn record(fabric_type: FabricType, tables: &ReferenceTables, user: &str) -> FabricRecord {
        let user: serde_yaml::Value = serde_yaml::from_str(user).unwrap();
        FabricRecord {
            name: "Site1".into(),
            fabric_type,
            properties: flatten(&deep_merge(&tables.defaults, &user)),
            child_fabrics: BTreeSet::new(),
            freeform: FabricFreeform::default(),
        }
    }

    const MAPPING: &str = "
General:
  BGP ASN: BGP_AS
  Replication Mode: REPLICATION_MODE
  Legacy Knob:
Advanced:
  Link Local: USE_LINK_LOCAL
  Leaf Freeform Config:
    Freeform: EXTRA_CONF_LEAF
";

    #[test]
    fn vxlan_payload_renames_drops_and_sets_site_id() {
        let t = tables(
            "General:\n  BGP ASN: 65000\n  Replication Mode: Multicast\n  Legacy Knob: x\nAdvanced:\n  Link Local: true\nvrfTemplate: Default_VRF_Universal\n",
            MAPPING,
        );
        let rec = record(FabricType::VxlanEvpn, &t, "General:\n  BGP ASN: 65001\nAdvanced:\n  Leaf Freeform Config:\n    Freeform: leaf.sh\n");
        let payload = fabric_payload(&rec, &t).unwrap();

        assert_eq!(payload.template, "Easy_Fabric");
        assert_eq!(payload.get("BGP_AS"), Some("65001"));
        assert_eq!(payload.get("SITE_ID"), Some("65001"));
        assert_eq!(payload.get("REPLICATION_MODE"), Some("Multicast"));
        assert_eq!(payload.get("FABRIC_NAME"), Some("Site1"));
        assert_eq!(payload.get("General_Legacy Knob"), None);
        assert_eq!(payload.get("USE_LINK_LOCAL"), None);
        assert_eq!(payload.get("vrfTemplate"), None);
        assert_eq!(payload.get("EXTRA_CONF_LEAF"), None);
    }

    #[test]
    fn vxlan_freeform_blocks_are_verbatim_and_banner_is_quoted() {
        let t = tables("General:\n  BGP ASN: 65000\n", MAPPING);
        let mut rec = record(FabricType::VxlanEvpn, &t, "");
        rec.freeform.leaf = Some("feature lacp\n".into());
        rec.freeform.banner = Some("Authorized only".into());
        let payload = fabric_payload(&rec, &t).unwrap();
        assert_eq!(payload.get("EXTRA_CONF_LEAF"), Some("feature lacp\n"));
        assert_eq!(payload.get("BANNER"), Some("`Authorized only`"));
    }

    #[test]
    fn isn_payload_is_external_without_site_id() {
        let t = tables("General:\n  BGP ASN: 65100\n", MAPPING);
        let mut rec = record(FabricType::InterSiteNetwork, &t, "");
        rec.freeform.fabric = Some("router bgp 65100".into());
        let payload = fabric_payload(&rec, &t).unwrap();
        assert_eq!(payload.template, "External_Fabric");
        assert_eq!(payload.get("SITE_ID"), None);
        assert_eq!(payload.get("FABRIC_TYPE"), Some("External"));
        assert_eq!(
            payload.get("EXT_FABRIC_TYPE"),
            Some("Multi-Site External Network")
        );
        assert_eq!(payload.get("FABRIC_FREEFORM"), Some("router bgp 65100"));
    }

    #[test]
    fn msd_payload_sets_family_markers() {
        let t = tables("General:\n  Anycast Gateway MAC: 2020.0000.00aa\n", "");
        let rec = record(FabricType::MultiSiteDomain, &t, "");
        let payload = fabric_payload(&rec, &t).unwrap();
        assert_eq!(payload.template, "MSD_Fabric");
        assert_eq!(payload.get("FABRIC_TYPE"), Some("MFD"));
        assert_eq!(payload.get("FF"), Some("MSD"));
        assert_eq!(
            payload.body()["General_Anycast Gateway MAC"],
            serde_json::json!("2020.0000.00aa")
        );
    }
}
