//! Clap derive structures for the `fabricctl` CLI.
//!
//! Defines the command tree, global flags and shared argument groups.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// fabricctl -- declarative VXLAN EVPN fabrics from YAML
#[derive(Debug, Parser)]
#[command(
    name = "fabricctl",
    version,
    about = "Build and reconcile NDFC fabrics from YAML declarations",
    long_about = "Translates the YAML tree under network_configs/ into Nexus Dashboard\n\
        Fabric Controller REST calls: fabrics, switches, VRFs, networks,\n\
        interfaces and vPC pairs. Nothing is deployed without review.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Project tree holding network_configs/ and resources/
    #[arg(long, short = 'C', global = true, value_name = "DIR")]
    pub project_root: Option<PathBuf>,

    /// Env file with controller secrets (default: <project-root>/.env)
    #[arg(long, global = true, value_name = "FILE")]
    pub env_file: Option<PathBuf>,

    /// Output format (default from settings, else table)
    #[arg(long, short = 'o', global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fabrics, multi-site domains and inter-site networks
    #[command(alias = "f")]
    Fabric(FabricArgs),

    /// VRFs declared in 5_segment/vrf.yaml
    Vrf(SegmentArgs),

    /// Networks declared in 5_segment/network.yaml
    #[command(alias = "net")]
    Network(SegmentArgs),

    /// Switch discovery, roles and addressing
    #[command(alias = "sw")]
    Switch(SwitchArgs),

    /// Interface policies and admin state
    #[command(alias = "if")]
    Interface(InterfaceArgs),

    /// vPC pairs declared under 3_node/<fabric>/vpc/
    Vpc(VpcArgs),

    /// Switch freeform policies
    Policy(PolicyArgs),

    /// Run the full bring-up pipeline (never deploys)
    Build(BuildArgs),

    /// Manage tool settings
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Arguments ─────────────────────────────────────────────────

/// A switch, addressed by fabric, role directory and file stem.
#[derive(Debug, Args)]
pub struct SwitchTarget {
    /// Fabric name
    pub fabric: String,
    /// Role directory under 3_node/<fabric>/ (e.g. leaf, spine)
    pub role: String,
    /// Switch file stem (sysName)
    pub switch: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  FABRIC
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct FabricArgs {
    #[command(subcommand)]
    pub command: FabricCommand,
}

#[derive(Debug, Subcommand)]
pub enum FabricCommand {
    /// List fabrics on the controller
    #[command(alias = "ls")]
    List,

    /// Show the create/update body built from YAML (no controller call)
    Payload { name: String },

    /// Create a fabric from its YAML
    Create { name: String },

    /// Push the YAML to an existing fabric
    Update { name: String },

    /// Delete a fabric
    Delete { name: String },

    /// Recalculate the fabric's config
    Recalculate { name: String },

    /// Write the controller's pending config to pending.txt
    #[command(alias = "get-pending")]
    Pending { name: String },

    /// Deploy pending config
    Deploy { name: String },

    /// Recalculate, review pending.txt, then deploy on approval
    DeployWorkflow { name: String },

    /// Multi-site domain membership
    Msd(MsdArgs),
}

#[derive(Debug, Args)]
pub struct MsdArgs {
    #[command(subcommand)]
    pub command: MsdCommand,
}

#[derive(Debug, Subcommand)]
pub enum MsdCommand {
    /// Move a child fabric into the MSD
    Add { msd: String, child: String },

    /// Take a child fabric out of the MSD
    Remove { msd: String, child: String },

    /// Add every declared child (all fabrics and ISNs when none are listed)
    AddChildren { msd: String },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  VRF / NETWORK
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SegmentArgs {
    #[command(subcommand)]
    pub command: SegmentCommand,
}

#[derive(Debug, Subcommand)]
pub enum SegmentCommand {
    /// List entries on the controller
    #[command(alias = "ls")]
    List { fabric: String },

    /// Create one entry from YAML
    Create { fabric: String, name: String },

    /// Update one entry from YAML
    Update { fabric: String, name: String },

    /// Detach from every switch, then delete
    Delete { fabric: String, name: String },

    /// Show what sync would delete, update and create
    Plan { fabric: String },

    /// Converge the controller on the YAML
    Sync { fabric: String },

    /// Attach everything the switch's interfaces reference
    Attach(SwitchTarget),

    /// Detach everything the switch's interfaces reference
    Detach(SwitchTarget),

    /// Reconcile one switch's attachments
    SyncAttachments(SwitchTarget),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SWITCH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SwitchArgs {
    #[command(subcommand)]
    pub command: SwitchCommand,
}

#[derive(Debug, Subcommand)]
pub enum SwitchCommand {
    /// List the fabric's switch inventory
    #[command(alias = "ls")]
    List { fabric: String },

    /// Discover the switch and assign its role
    Create {
        #[command(flatten)]
        target: SwitchTarget,

        /// Keep the device's existing configuration
        #[arg(long)]
        preserve_config: bool,
    },

    /// Discover every switch declared for the fabric
    CreateAll {
        fabric: String,

        /// Keep the devices' existing configuration
        #[arg(long)]
        preserve_config: bool,
    },

    /// Remove the switch from its fabric
    Delete(SwitchTarget),

    /// Assign the role declared in YAML
    Role(SwitchTarget),

    /// Rename the switch through its host policy
    Hostname {
        #[command(flatten)]
        target: SwitchTarget,

        /// New hostname
        hostname: String,
    },

    /// Point the controller at a new management address
    ChangeIp {
        #[command(flatten)]
        target: SwitchTarget,

        /// New address, with or without /prefix
        ip: String,
    },

    /// Rediscover the switch
    Rediscover(SwitchTarget),

    /// Deploy pending config to this switch only
    Deploy(SwitchTarget),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  INTERFACE / VPC / POLICY
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct InterfaceArgs {
    #[command(subcommand)]
    pub command: InterfaceCommand,
}

#[derive(Debug, Subcommand)]
pub enum InterfaceCommand {
    /// Push policies and admin state, then shut undeclared ports
    Update(SwitchTarget),

    /// Update every switch of the fabric
    UpdateAll { fabric: String },

    /// List the controller's interfaces for a switch serial
    #[command(alias = "ls")]
    List { serial: String },
}

#[derive(Debug, Args)]
pub struct VpcArgs {
    #[command(subcommand)]
    pub command: VpcCommand,
}

#[derive(Debug, Subcommand)]
pub enum VpcCommand {
    /// Pair the peers and create the vPC interface
    Create { fabric: String, stem: String },

    /// Mark-delete the vPC interface and unpair
    Delete { fabric: String, stem: String },

    /// List the pairs declared for the fabric (no controller call)
    #[command(alias = "ls")]
    List { fabric: String },
}

#[derive(Debug, Args)]
pub struct PolicyArgs {
    #[command(subcommand)]
    pub command: PolicyCommand,
}

#[derive(Debug, Subcommand)]
pub enum PolicyCommand {
    /// Replace the switch's freeform policy
    Create(SwitchTarget),

    /// Delete the switch's freeform policies
    Delete(SwitchTarget),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  BUILD / CONFIG / COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Keep existing device configuration on discovery
    #[arg(long)]
    pub preserve_config: bool,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a settings file with the defaults
    Init,

    /// Display the resolved settings
    Show,

    /// Print the settings file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
