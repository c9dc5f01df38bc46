use fabricctl_api::types::PolicyRecord;
use indexmap::IndexMap;
use serde_json::Value;
use uuid::Uuid;

use crate::model::SwitchRecord;

pub const FREEFORM_TEMPLATE: &str = "switch_freeform";
pub const HOSTNAME_TEMPLATE: &str = "host_11_1";
const FREEFORM_PRIORITY: u32 = 500;
const POLICY_ID_SPAN: u32 = 900_000;
const POLICY_ID_FLOOR: u64 = 100_000;

/// Random six-digit policy number.
pub fn random_policy_number() -> u64 {
    let bytes = Uuid::new_v4().into_bytes();
    let n = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    POLICY_ID_FLOOR + u64::from(n % POLICY_ID_SPAN)
}

/// `switch_freeform` policy carrying the switch's freeform CLI.
pub fn switch_freeform_policy(switch: &SwitchRecord, conf: &str, number: u64) -> PolicyRecord {
    let policy_id = format!("POLICY-{number}");
    let description = format!("{} freeform policy", switch.name);
    let nv_pairs: IndexMap<String, Value> = [
        ("SECENTITY", String::new()),
        ("PRIORITY", FREEFORM_PRIORITY.to_string()),
        ("POLICY_DESC", description.clone()),
        ("CONF", conf.to_owned()),
        ("SECENTTYPE", String::new()),
        ("FABRIC_NAME", switch.fabric.clone()),
        ("POLICY_ID", policy_id.clone()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_owned(), Value::String(v)))
    .collect();

    PolicyRecord {
        id: Some(number),
        policy_id,
        description,
        serial_number: switch.serial_number.clone(),
        entity_type: "SWITCH".into(),
        entity_name: "SWITCH".into(),
        template_name: FREEFORM_TEMPLATE.into(),
        template_content_type: "PYTHON".into(),
        nv_pairs,
        generated_config: String::new(),
        auto_generated: false,
        deleted: false,
        source: String::new(),
        priority: FREEFORM_PRIORITY,
        status: "NA".into(),
    }
}
