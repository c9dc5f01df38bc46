// ── Raw YAML -> canonical records ──

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use indexmap::IndexMap;
use serde_yaml::Value;
use strum::IntoEnumIterator;
use tracing::debug;

use super::layout::{sub_dirs, yaml_stems};
use super::merge::{deep_merge, flatten, key_string, scalar_map};
use super::raw::{
    RawInterface, RawNetwork, RawNetworkFile, RawSwitch, RawVpc, RawVpcPolicy, RawVrf,
    RawVrfFile, text,
};
use super::ConfigLoader;
use crate::error::CoreError;
use crate::model::interface::{ACCESS_POLICY, ROUTED_POLICY, TRUNK_POLICY};
use crate::model::vpc::{DEFAULT_VPC_POLICY, parse_legacy_stem};
use crate::model::{
    AllowedVlans, FabricFreeform, FabricRecord, FabricType, InterfacePolicy, InterfaceRecord,
    NetworkRecord, Scalar, SwitchRecord, SwitchRole, VpcPairRecord, VpcPolicyConfig, VrfRecord,
};
use crate::range::expand_interfaces;

const DEFAULT_VERSION: &str = "9.3(15)";
const CHILD_FABRICS_KEY: &str = "Child Fabrics";
const PORT_CHANNEL_PREFIX: &str = "int_port_channel";
const VPC_DIR: &str = "vpc";

// VXLAN freeform overrides in `{name}_FreeForm/`.
const AAA_FILE: &str = "AAA Freeform Config.sh";
const LEAF_FILE: &str = "Leaf Freeform Config.sh";
const SPINE_FILE: &str = "Spine Freeform Config.sh";
const BANNER_FILE: &str = "Banner.sh";
const INTRA_LINKS_FILE: &str = "Intra-fabric Links Additional Config.sh";

impl ConfigLoader {
    // ── Fabrics ──────────────────────────────────────────────────────

    /// Fabric type, found by which directory holds `{name}.yaml`.
    pub fn fabric_type_of(&self, name: &str) -> Result<FabricType, CoreError> {
        FabricType::iter()
            .find(|ty| self.layout.fabric_file(*ty, name).is_file())
            .ok_or_else(|| CoreError::ConfigNotFound {
                kind: "fabric".into(),
                key: name.into(),
                path: None,
            })
    }

    /// Declared fabric names of one type, sorted.
    pub fn fabric_names(&self, fabric_type: FabricType) -> Result<Vec<String>, CoreError> {
        let dir = self.layout.fabric_dir(fabric_type);
        yaml_stems(&dir).map_err(|source| CoreError::Io { path: dir, source })
    }

    /// Every declared fabric, VXLAN first, then ISN, then MSD.
    pub fn fabrics(&self) -> Result<Vec<FabricRecord>, CoreError> {
        let mut out = Vec::new();
        for ty in [
            FabricType::VxlanEvpn,
            FabricType::InterSiteNetwork,
            FabricType::MultiSiteDomain,
        ] {
            for name in self.fabric_names(ty)? {
                out.push(self.fabric(&name)?);
            }
        }
        Ok(out)
    }

    pub fn fabric(&self, name: &str) -> Result<FabricRecord, CoreError> {
        let fabric_type = self.fabric_type_of(name)?;
        let path = self.layout.fabric_file(fabric_type, name);
        let user = self.read_yaml(&path)?;
        let tables = self.tables(fabric_type.table_name())?;

        let mut user_props = Value::clone(&user);
        let children = match &mut user_props {
            Value::Mapping(map) => map.remove(CHILD_FABRICS_KEY),
            _ => None,
        };
        let child_fabrics = match (fabric_type, children) {
            (FabricType::MultiSiteDomain, Some(value)) => string_list(&value),
            (_, Some(_)) => {
                return Err(CoreError::ConfigValidation {
                    entity: format!("fabric {name}"),
                    field: CHILD_FABRICS_KEY.into(),
                    reason: format!("is only valid for {}", FabricType::MultiSiteDomain),
                });
            }
            (_, None) => BTreeSet::new(),
        };

        let merged = deep_merge(&tables.defaults, &user_props);
        let freeform = match fabric_type {
            FabricType::VxlanEvpn => self.vxlan_freeform(name, &merged)?,
            FabricType::InterSiteNetwork => self.isn_freeform(&tables.defaults)?,
            FabricType::MultiSiteDomain => FabricFreeform::default(),
        };

        Ok(FabricRecord {
            name: name.into(),
            fabric_type,
            properties: flatten(&merged),
            child_fabrics,
            freeform,
        })
    }

    fn vxlan_freeform(&self, name: &str, config: &Value) -> Result<FabricFreeform, CoreError> {
        let root = self.layout.root();
        let declared = |section: &str, key: &str| {
            config
                .get(section)
                .and_then(|s| s.get(key))
                .and_then(|c| c.get("Freeform"))
                .and_then(Value::as_str)
                .map(|p| Self::resolve(root, p))
        };

        let mut aaa = declared("Advanced", "AAA Freeform Config")
            .or_else(|| declared("Manageability", "AAA Freeform Config"));
        let mut leaf = declared("Advanced", "Leaf Freeform Config");
        let mut spine = declared("Advanced", "Spine Freeform Config");
        let mut intra = declared("Advanced", "Intra-fabric Links Additional Config");
        let mut banner = Some(self.layout.freeform_resources().join(BANNER_FILE));

        let overrides = self.layout.fabric_freeform_dir(name);
        if overrides.is_dir() {
            for (slot, file) in [
                (&mut aaa, AAA_FILE),
                (&mut leaf, LEAF_FILE),
                (&mut spine, SPINE_FILE),
                (&mut banner, BANNER_FILE),
                (&mut intra, INTRA_LINKS_FILE),
            ] {
                let candidate = overrides.join(file);
                if candidate.is_file() {
                    *slot = Some(candidate);
                }
            }
        }

        Ok(FabricFreeform {
            leaf: self.read_optional(leaf.as_deref())?,
            spine: self.read_optional(spine.as_deref())?,
            aaa: self.read_optional(aaa.as_deref())?,
            banner: self.read_optional(banner.as_deref())?,
            intra_links: self.read_optional(intra.as_deref())?,
            fabric: None,
        })
    }

    fn isn_freeform(&self, defaults: &Value) -> Result<FabricFreeform, CoreError> {
        let root = self.layout.root();
        let declared = |key: &str| {
            defaults
                .get("Advanced")
                .and_then(|a| a.get(key))
                .and_then(|c| c.get("freeform"))
                .and_then(Value::as_str)
                .map(|p| Self::resolve(root, p))
        };
        Ok(FabricFreeform {
            fabric: self.read_optional(declared("Fabric Freeform").as_deref())?,
            aaa: self.read_optional(declared("AAA Freeform Config").as_deref())?,
            ..FabricFreeform::default()
        })
    }

    fn read_optional(&self, path: Option<&Path>) -> Result<Option<String>, CoreError> {
        match path {
            Some(path) => self.read_freeform(path),
            None => Ok(None),
        }
    }

    // ── VRFs ─────────────────────────────────────────────────────────

    /// VRFs declared for `fabric`, in file order.
    pub fn vrfs(&self, fabric: &str) -> Result<Vec<VrfRecord>, CoreError> {
        let path = self.layout.vrf_file();
        require_file("vrf collection", &path)?;
        let file: RawVrfFile = self.parse(&path)?;
        let records = file
            .vrfs
            .into_iter()
            .filter(|raw| raw.fabric.as_deref() == Some(fabric))
            .map(|raw| vrf_record(fabric, raw))
            .collect::<Result<Vec<_>, _>>()?;
        ensure_unique("vrf", records.iter().map(|r| r.name.as_str()))?;
        Ok(records)
    }

    pub fn vrf(&self, fabric: &str, name: &str) -> Result<VrfRecord, CoreError> {
        self.vrfs(fabric)?
            .into_iter()
            .find(|v| v.name == name)
            .ok_or_else(|| not_found("vrf", fabric, name))
    }

    // ── Networks ─────────────────────────────────────────────────────

    /// Networks declared for `fabric`, in file order.
    pub fn networks(&self, fabric: &str) -> Result<Vec<NetworkRecord>, CoreError> {
        let path = self.layout.network_file();
        require_file("network collection", &path)?;
        let file: RawNetworkFile = self.parse(&path)?;
        let records = file
            .networks
            .into_iter()
            .filter(|raw| raw.fabric.as_deref() == Some(fabric))
            .map(|raw| network_record(fabric, raw))
            .collect::<Result<Vec<_>, _>>()?;
        ensure_unique("network", records.iter().map(|r| r.name.as_str()))?;
        Ok(records)
    }

    pub fn network(&self, fabric: &str, name: &str) -> Result<NetworkRecord, CoreError> {
        self.networks(fabric)?
            .into_iter()
            .find(|n| n.name == name)
            .ok_or_else(|| not_found("network", fabric, name))
    }

    // ── Switches ─────────────────────────────────────────────────────

    /// Load `3_node/{fabric}/{role_dir}/{name}.yaml`.
    pub fn switch(&self, fabric: &str, role_dir: &str, name: &str) -> Result<SwitchRecord, CoreError> {
        let path = self.layout.switch_file(fabric, role_dir, name);
        if !path.is_file() {
            return Err(CoreError::ConfigNotFound {
                kind: "switch".into(),
                key: format!("{fabric}/{role_dir}/{name}"),
                path: Some(path),
            });
        }
        let raw: RawSwitch = self.parse(&path)?;
        let entity = format!("switch {name}");

        let serial_number = text(raw.serial_number.as_ref())
            .ok_or_else(|| CoreError::missing_field(&entity, "Serial Number"))?;
        let role_text = raw.role.as_deref().unwrap_or(role_dir);
        let role = SwitchRole::parse_lenient(role_text).ok_or_else(|| CoreError::ConfigValidation {
            entity: entity.clone(),
            field: "Role".into(),
            reason: format!("'{role_text}' is not a valid switch role"),
        })?;
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let mut interfaces = Vec::new();
        for (if_name, body) in interface_entries(&raw.interfaces) {
            let raw_if: RawInterface = if body.is_null() {
                RawInterface::default()
            } else {
                serde_yaml::from_value(body).map_err(|source| CoreError::Yaml {
                    path: path.clone(),
                    source,
                })?
            };
            interfaces.push(self.interface_record(&entity, &dir, if_name, raw_if)?);
        }
        ensure_unique("interface", interfaces.iter().map(|i| i.name.as_str()))?;

        Ok(SwitchRecord {
            fabric: fabric.into(),
            name: name.into(),
            serial_number,
            ip_address: text(raw.ip_address.as_ref()),
            platform: text(raw.platform.as_ref()).unwrap_or_default(),
            version: text(raw.version.as_ref()).unwrap_or_else(|| DEFAULT_VERSION.into()),
            role,
            dir,
            freeform_config: raw.freeform_config.filter(|p| !p.trim().is_empty()),
            interfaces,
        })
    }

    /// Every switch under `3_node/{fabric}/`, grouped by role directory.
    pub fn switches(&self, fabric: &str) -> Result<Vec<SwitchRecord>, CoreError> {
        let base = self.layout.switch_fabric_dir(fabric);
        let roles = sub_dirs(&base).map_err(|source| CoreError::Io {
            path: base.clone(),
            source,
        })?;
        let mut out = Vec::new();
        for role in roles.iter().filter(|r| r.as_str() != VPC_DIR) {
            let dir = base.join(role);
            let stems = yaml_stems(&dir).map_err(|source| CoreError::Io { path: dir, source })?;
            for stem in stems {
                out.push(self.switch(fabric, role, &stem)?);
            }
        }
        debug!(fabric, count = out.len(), "loaded switches");
        Ok(out)
    }

    /// Look a switch up by file stem across role directories.
    pub fn find_switch(&self, fabric: &str, name: &str) -> Result<SwitchRecord, CoreError> {
        self.switches(fabric)?
            .into_iter()
            .find(|s| s.name == name)
            .ok_or_else(|| not_found("switch", fabric, name))
    }

    fn interface_record(
        &self,
        entity: &str,
        dir: &Path,
        name: String,
        raw: RawInterface,
    ) -> Result<InterfaceRecord, CoreError> {
        let field_err = |field: &str, reason: String| CoreError::ConfigValidation {
            entity: format!("{entity} interface {name}"),
            field: field.into(),
            reason,
        };
        let policy = match raw.policy.as_deref().map(str::trim) {
            Some(ACCESS_POLICY) => InterfacePolicy::Access {
                vlan: raw
                    .access_vlan
                    .as_ref()
                    .filter(|s| !s.is_blank())
                    .map(|s| vlan_id(s).map_err(|r| field_err("Access Vlan", r)))
                    .transpose()?,
            },
            Some(TRUNK_POLICY) => InterfacePolicy::Trunk {
                allowed: allowed_vlans(raw.allowed_vlans.as_ref())?,
            },
            Some(ROUTED_POLICY) => InterfacePolicy::Routed {
                vrf: text(raw.vrf.as_ref()),
                ip: text(raw.ip.as_ref()),
                prefix: text(raw.prefix.as_ref()),
            },
            Some(template) if template.starts_with(PORT_CHANNEL_PREFIX) => {
                let members = match text(raw.members.as_ref()) {
                    Some(list) => expand_interfaces(&list)?,
                    None => Vec::new(),
                };
                InterfacePolicy::PortChannel {
                    template: template.to_owned(),
                    members,
                    mode: text(raw.pc_mode.as_ref()),
                    allowed: allowed_vlans(raw.allowed_vlans.as_ref())?,
                }
            }
            Some(other) => {
                debug!(interface = %name, policy = other, "unmanaged interface policy");
                InterfacePolicy::None
            }
            None => InterfacePolicy::None,
        };
        let admin_enabled = match raw.enabled.as_ref() {
            Some(flag) => flag
                .as_bool()
                .ok_or_else(|| field_err("Enable Interface", format!("'{flag}' is not a boolean")))?,
            None => true,
        };
        let freeform = match raw.freeform.as_deref().filter(|p| !p.trim().is_empty()) {
            Some(written) => self.read_freeform(&Self::resolve(dir, written))?,
            None => None,
        };
        Ok(InterfaceRecord {
            name,
            description: text(raw.description.as_ref()),
            admin_enabled,
            policy,
            mtu: text(raw.mtu.as_ref()),
            speed: text(raw.speed.as_ref()),
            freeform,
        })
    }

    // ── vPC pairs ────────────────────────────────────────────────────

    /// Every vPC pair file under `3_node/{fabric}/vpc/`.
    pub fn vpc_pairs(&self, fabric: &str) -> Result<Vec<VpcPairRecord>, CoreError> {
        let dir = self.layout.vpc_dir(fabric);
        let stems = yaml_stems(&dir).map_err(|source| CoreError::Io { path: dir, source })?;
        stems.iter().map(|stem| self.vpc_pair(fabric, stem)).collect()
    }

    /// Load `3_node/{fabric}/vpc/{stem}.yaml`.
    pub fn vpc_pair(&self, fabric: &str, stem: &str) -> Result<VpcPairRecord, CoreError> {
        let path = self.layout.vpc_dir(fabric).join(format!("{stem}.yaml"));
        if !path.is_file() {
            return Err(CoreError::ConfigNotFound {
                kind: "vpc pair".into(),
                key: format!("{fabric}/{stem}"),
                path: Some(path),
            });
        }
        let raw: RawVpc = self.parse(&path)?;
        let legacy = parse_legacy_stem(stem);
        let entity = format!("vpc {stem}");

        let name = text(raw.name.as_ref())
            .or_else(|| legacy.map(|(_, _, n)| n.to_owned()))
            .ok_or_else(|| CoreError::missing_field(&entity, "VPC Name"))?;
        let peer1_serial = text(raw.peer1.as_ref())
            .or_else(|| legacy.map(|(p, _, _)| p.to_owned()))
            .ok_or_else(|| CoreError::missing_field(&entity, "Peer-1 Serial Number"))?;
        let peer2_serial = text(raw.peer2.as_ref())
            .or_else(|| legacy.map(|(_, p, _)| p.to_owned()))
            .ok_or_else(|| CoreError::missing_field(&entity, "Peer-2 Serial Number"))?;
        if peer1_serial == peer2_serial {
            return Err(CoreError::ConfigValidation {
                entity,
                field: "Peer-2 Serial Number".into(),
                reason: "must differ from Peer-1 Serial Number".into(),
            });
        }

        Ok(VpcPairRecord {
            fabric: fabric.into(),
            name,
            peer1_serial,
            peer2_serial,
            policy: raw.policy.map(vpc_policy).transpose()?,
            source: path,
        })
    }
}

// ── Conversion helpers ───────────────────────────────────────────────

fn vrf_record(fabric: &str, raw: RawVrf) -> Result<VrfRecord, CoreError> {
    let name = text(raw.name.as_ref()).ok_or_else(|| CoreError::missing_field("vrf", "VRF Name"))?;
    let entity = format!("vrf {name}");
    let vrf_id = required_u32(&entity, "VRF ID", raw.vrf_id.as_ref())?;
    let vlan = raw
        .vlan_id
        .as_ref()
        .ok_or_else(|| CoreError::missing_field(&entity, "VLAN ID"))?;
    let vlan_id = vlan_id(vlan).map_err(|reason| CoreError::ConfigValidation {
        entity: entity.clone(),
        field: "VLAN ID".into(),
        reason,
    })?;
    Ok(VrfRecord {
        fabric: fabric.into(),
        name,
        vrf_id,
        vlan_id,
        vlan_name: text(raw.vlan_name.as_ref()),
        interface_description: text(raw.interface_description.as_ref()),
        description: text(raw.description.as_ref()),
        overrides: overrides(&raw.general, &raw.advanced),
    })
}

fn network_record(fabric: &str, raw: RawNetwork) -> Result<NetworkRecord, CoreError> {
    let name = text(raw.name.as_ref())
        .ok_or_else(|| CoreError::missing_field("network", "Network Name"))?;
    let entity = format!("network {name}");
    let network_id = required_u32(&entity, "Network ID", raw.network_id.as_ref())?;
    let vlan = raw
        .vlan_id
        .as_ref()
        .ok_or_else(|| CoreError::missing_field(&entity, "VLAN ID"))?;
    let vlan = vlan_id(vlan).map_err(|reason| CoreError::ConfigValidation {
        entity: entity.clone(),
        field: "VLAN ID".into(),
        reason,
    })?;
    let layer2_only = match raw.layer2_only.as_ref() {
        Some(flag) => flag.as_bool().ok_or_else(|| CoreError::ConfigValidation {
            entity: entity.clone(),
            field: "Layer 2 Only".into(),
            reason: format!("'{flag}' is not a boolean"),
        })?,
        None => false,
    };
    let vrf = text(raw.vrf.as_ref());
    if !layer2_only && vrf.is_none() {
        return Err(CoreError::ConfigValidation {
            entity,
            field: "VRF Name".into(),
            reason: "is required unless Layer 2 Only is set".into(),
        });
    }

    let mut record = NetworkRecord::new(fabric.into(), name, network_id, vlan, vrf, layer2_only);
    record.vlan_name = text(raw.vlan_name.as_ref());
    record.interface_description = text(raw.interface_description.as_ref());
    record.gateway = text(raw.gateway.as_ref());
    record.overrides = overrides(&raw.general, &raw.advanced);
    Ok(record)
}

fn vpc_policy(raw: RawVpcPolicy) -> Result<VpcPolicyConfig, CoreError> {
    let general = raw.general;
    let defaults = VpcPolicyConfig::default();
    let members = |value: Option<&Scalar>| -> Result<String, CoreError> {
        let list = text(value).unwrap_or_default();
        if !list.is_empty() {
            expand_interfaces(&list)?;
        }
        Ok(list)
    };
    let vlans = |value: Option<&Scalar>| -> Result<String, CoreError> {
        let list = text(value).unwrap_or_default();
        if !list.is_empty() {
            AllowedVlans::parse(Some(&list))?;
        }
        Ok(list)
    };
    let flag = |value: Option<&Scalar>| value.and_then(Scalar::as_bool).unwrap_or(false);

    Ok(VpcPolicyConfig {
        template: raw
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_VPC_POLICY.into()),
        peer1_pcid: text(general.peer1_pcid.as_ref()).unwrap_or(defaults.peer1_pcid),
        peer2_pcid: text(general.peer2_pcid.as_ref()).unwrap_or(defaults.peer2_pcid),
        mode: text(general.mode.as_ref()).unwrap_or(defaults.mode),
        peer1_members: members(general.peer1_members.as_ref())?,
        peer2_members: members(general.peer2_members.as_ref())?,
        peer1_allowed_vlans: vlans(general.peer1_allowed.as_ref())?,
        peer2_allowed_vlans: vlans(general.peer2_allowed.as_ref())?,
        bpdu_guard: flag(general.bpdu_guard.as_ref()),
        port_type_fast: flag(general.port_type_fast.as_ref()),
    })
}

fn allowed_vlans(value: Option<&Scalar>) -> Result<AllowedVlans, CoreError> {
    let list = value.map(ToString::to_string);
    Ok(AllowedVlans::parse(list.as_deref())?)
}

fn vlan_id(value: &Scalar) -> Result<u16, String> {
    value
        .as_i64()
        .and_then(|v| u16::try_from(v).ok())
        .filter(|v| (1..=4094).contains(v))
        .ok_or_else(|| format!("'{value}' is not a VLAN id between 1 and 4094"))
}

fn required_u32(entity: &str, field: &str, value: Option<&Scalar>) -> Result<u32, CoreError> {
    let value = value.ok_or_else(|| CoreError::missing_field(entity, field))?;
    value
        .as_i64()
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| CoreError::ConfigValidation {
            entity: entity.into(),
            field: field.into(),
            reason: format!("'{value}' is not a non-negative integer"),
        })
}

fn overrides(general: &Value, advanced: &Value) -> IndexMap<String, IndexMap<String, Scalar>> {
    let mut out = IndexMap::new();
    for (section, value) in [("General Parameters", general), ("Advanced", advanced)] {
        let values = scalar_map(value);
        if !values.is_empty() {
            out.insert(section.to_owned(), values);
        }
    }
    out
}

/// `Interface:` as a list of single-key maps, or one map.
fn interface_entries(value: &Value) -> Vec<(String, Value)> {
    let mut out = Vec::new();
    let mut push_map = |map: &serde_yaml::Mapping| {
        for (k, v) in map {
            if let Some(name) = key_string(k) {
                out.push((name.trim().to_owned(), v.clone()));
            }
        }
    };
    match value {
        Value::Sequence(items) => items.iter().filter_map(Value::as_mapping).for_each(&mut push_map),
        Value::Mapping(map) => push_map(map),
        _ => {}
    }
    out
}

fn string_list(value: &Value) -> BTreeSet<String> {
    match value {
        Value::Sequence(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) => s
            .split(',')
            .map(|p| p.trim().to_owned())
            .filter(|p| !p.is_empty())
            .collect(),
        _ => BTreeSet::new(),
    }
}

fn require_file(kind: &str, path: &Path) -> Result<(), CoreError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(CoreError::ConfigNotFound {
            kind: kind.into(),
            key: path.display().to_string(),
            path: Some(path.to_path_buf()),
        })
    }
}

fn not_found(kind: &str, fabric: &str, name: &str) -> CoreError {
    CoreError::ConfigNotFound {
        kind: kind.into(),
        key: format!("{fabric}/{name}"),
        path: None,
    }
}

fn ensure_unique<'a>(kind: &str, names: impl Iterator<Item = &'a str>) -> Result<(), CoreError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(CoreError::ConfigValidation {
                entity: format!("{kind} {name}"),
                field: "name".into(),
                reason: "is declared more than once".into(),
            });
        }
    }
    Ok(())
}
