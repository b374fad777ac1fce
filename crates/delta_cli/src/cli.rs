use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "quillai-delta")]
#[command(about = "Exercise the QuillAi Delta OT algebra from the command line")]
pub struct App {
    #[command(subcommand)]
    pub command: Command,

    /// Log level
    #[clap(
        long,
        value_enum,
        default_value = "warn",
        env = "QUILLAI_DELTA_LOG_LEVEL",
        global = true
    )]
    pub log_level: quillai_log::LogLevel,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compose a base delta with a change delta, printing the result.
    Compose(TwoDeltaArgs),

    /// Diff two documents, printing the delta that turns the first into the second.
    Diff(TwoDeltaArgs),

    /// Invert a delta given its base document, printing the inverse delta.
    Invert {
        /// Path to the JSON file holding the delta to invert.
        delta: std::path::PathBuf,
        /// Path to the JSON file holding the base document.
        base: std::path::PathBuf,
    },

    /// Rebase one delta against a concurrent delta.
    Transform {
        /// Path to the JSON file holding the left-hand (already applied) delta.
        a: std::path::PathBuf,
        /// Path to the JSON file holding the right-hand (concurrent) delta.
        b: std::path::PathBuf,
        /// Whether `a` wins ties at identical insert points.
        #[clap(long)]
        priority: bool,
    },

    /// Render a document delta to plain text.
    Document {
        /// Path to the JSON file holding a document (insert-only) delta.
        delta: std::path::PathBuf,
    },
}

#[derive(Debug, clap::Args)]
pub struct TwoDeltaArgs {
    /// Path to the JSON file holding the first operand.
    pub first: std::path::PathBuf,
    /// Path to the JSON file holding the second operand.
    pub second: std::path::PathBuf,
}
