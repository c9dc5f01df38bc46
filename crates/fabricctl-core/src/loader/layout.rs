// ── Project directory layout ──

use std::path::{Path, PathBuf};

use crate::model::FabricType;

const NETWORK_CONFIGS: &str = "network_configs";
const FABRIC_ROOT: &str = "1_vxlan_evpn";
const NODE_ROOT: &str = "3_node";
const SEGMENT_ROOT: &str = "5_segment";
const RESOURCES: &str = "resources";

/// Resolves every path the loader reads, rooted at the project directory.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn network_configs(&self) -> PathBuf {
        self.root.join(NETWORK_CONFIGS)
    }

    // ── Fabrics ──────────────────────────────────────────────────────

    pub fn fabric_dir(&self, fabric_type: FabricType) -> PathBuf {
        self.network_configs()
            .join(FABRIC_ROOT)
            .join(fabric_type.config_dir())
    }

    pub fn fabric_file(&self, fabric_type: FabricType, name: &str) -> PathBuf {
        self.fabric_dir(fabric_type).join(format!("{name}.yaml"))
    }

    /// Per-fabric freeform overrides (`{name}_FreeForm/`).
    pub fn fabric_freeform_dir(&self, name: &str) -> PathBuf {
        self.fabric_dir(FabricType::VxlanEvpn)
            .join(format!("{name}_FreeForm"))
    }

    // ── Nodes ────────────────────────────────────────────────────────

    pub fn node_root(&self) -> PathBuf {
        self.network_configs().join(NODE_ROOT)
    }

    pub fn switch_fabric_dir(&self, fabric: &str) -> PathBuf {
        self.node_root().join(fabric)
    }

    pub fn switch_file(&self, fabric: &str, role: &str, switch: &str) -> PathBuf {
        self.switch_fabric_dir(fabric)
            .join(role)
            .join(format!("{switch}.yaml"))
    }

    pub fn vpc_dir(&self, fabric: &str) -> PathBuf {
        self.switch_fabric_dir(fabric).join("vpc")
    }

    // ── Segments ─────────────────────────────────────────────────────

    pub fn vrf_file(&self) -> PathBuf {
        self.network_configs().join(SEGMENT_ROOT).join("vrf.yaml")
    }

    pub fn network_file(&self) -> PathBuf {
        self.network_configs().join(SEGMENT_ROOT).join("network.yaml")
    }

    // ── Resources ────────────────────────────────────────────────────

    pub fn corp_defaults(&self, table: &str) -> PathBuf {
        self.root
            .join(RESOURCES)
            .join("corp_defaults")
            .join(format!("{table}.yaml"))
    }

    pub fn field_mapping(&self, table: &str) -> PathBuf {
        self.root
            .join(RESOURCES)
            .join("_field_mapping")
            .join(format!("{table}.yaml"))
    }

    pub fn freeform_resources(&self) -> PathBuf {
        self.root.join(RESOURCES).join("freeform")
    }

    /// Default location of the rendered pending-config report.
    pub fn pending_report(&self) -> PathBuf {
        self.root.join("pending.txt")
    }
}

/// YAML file stems in `dir`, sorted. A missing directory yields nothing.
pub(crate) fn yaml_stems(dir: &Path) -> std::io::Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut stems = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_yaml = path
            .extension()
            .is_some_and(|ext| ext == "yaml" || ext == "yml");
        if path.is_file() && is_yaml {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                stems.push(stem.to_owned());
            }
        }
    }
    stems.sort();
    Ok(stems)
}

/// Sub-directory names of `dir`, sorted. A missing directory yields nothing.
pub(crate) fn sub_dirs(dir: &Path) -> std::io::Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
                names.push(name.to_owned());
            }
        }
    }
    names.sort();
    Ok(names)
}
