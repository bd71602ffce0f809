//! # Generator Module
//!
//! Turns a normalized [`ApiModel`](crate::spec::ApiModel) into the source
//! files of a TypeScript Hono application.
//!
//! ## Architecture
//!
//! The generator renders embedded minijinja templates with a fixed helper set:
//!
//! ```text
//! ApiModel → partition_by_tag → Renderer (templates + helpers) → OutputSink
//! ```
//!
//! 1. **Type tables** ([`type_map`]) - OpenAPI types to storage columns,
//!    validators and status constants
//! 2. **Case helpers** ([`case`]) - first-character and underscore-insertion
//!    transforms used for identifiers and column names
//! 3. **Renderer** ([`Renderer`]) - an immutable template environment built
//!    once per run and shared by every render call
//! 4. **Emitter** ([`Emitter`]) - schema file, per-tag files, route index
//! 5. **Scaffolding** ([`create_app`]) - input checks, static app tree, spec
//!    copy, then the emitter
//!
//! ## Generated Structure
//!
//! With the default layout and a spec whose operations are tagged `Pets`:
//!
//! ```text
//! my-app/
//! ├── package.json
//! ├── tsconfig.json
//! ├── drizzle.config.ts
//! ├── README.md
//! ├── doc/
//! │   └── openapi.yaml            # Copy of the input spec
//! └── src/
//!     ├── index.ts
//!     ├── app.ts
//!     ├── lib/                    # createApp / createRouter, handler types
//!     ├── db/
//!     │   ├── index.ts
//!     │   └── schema.ts           # One table + three validators per schema
//!     └── routes/
//!         ├── index.ts            # All tag routers
//!         ├── pets.routes.ts      # createRoute(...) per operation
//!         ├── pets.handlers.ts    # CRUD-shaped stub per operation
//!         └── pets.index.ts       # Router binding routes to handlers
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use oas_scaffold::generator::{create_app, ScaffoldOptions};
//!
//! let mut options = ScaffoldOptions::new("petstore", "openapi.yaml");
//! options.output_dir = "apps".into();
//! let report = create_app(&options)?;
//! println!("{} files in {}", report.files.len(), report.target.display());
//! ```
//!
//! Paths under the app root are configurable through `scaffold.toml`, see
//! [`config`].

pub mod case;
pub mod config;
mod project;
pub mod sink;
mod templates;
pub mod type_map;
#[cfg(test)]
mod tests;

pub use config::{load_config, resolve_config, OutputLayout, ScaffoldConfig, CONFIG_FILE_NAME};
pub use project::*;
pub use sink::{FsSink, MemorySink, OutputSink};
pub use templates::{helper_environment, Renderer, TemplateKind};
