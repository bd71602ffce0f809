//! # CLI Module
//!
//! Command-line front end of the scaffolder.
//!
//! ## Commands
//!
//! ### `new`
//!
//! Create an application directory from an OpenAPI specification:
//!
//! ```bash
//! oas-scaffold new petstore --spec openapi.yaml --output-dir apps
//! ```
//!
//! Options:
//! - `--spec <FILE>` - Path to the OpenAPI specification (required)
//! - `--output-dir <DIR>` - Parent of the new application directory (default: `.`)
//! - `--config <FILE>` - Layout configuration (default: `scaffold.toml` next to the spec)
//! - `--template-dir <DIR>` - Application tree replacing the built-in one
//! - `--dry-run` - List the files that would be written
//!
//! The command refuses to run when `<output-dir>/<app-name>` already exists.
//!
//! ### `inspect`
//!
//! Print the normalized endpoints, grouped the way files would be generated:
//!
//! ```bash
//! oas-scaffold inspect --spec openapi.yaml
//! ```
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use oas_scaffold::cli::{run, Cli};
//! use clap::Parser;
//!
//! let cli = Cli::parse_from(["oas-scaffold", "inspect", "--spec", "openapi.yaml"]);
//! run(cli)?;
//! ```

mod commands;


pub use commands::{run, run_cli, Cli, Commands};
