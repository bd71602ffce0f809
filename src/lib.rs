//! # oas-scaffold
//!
//! **oas-scaffold** creates a backend application skeleton from an
//! [OpenAPI 3.x](https://spec.openapis.org/oas/v3.0.3) document: a Hono
//! service with `@hono/zod-openapi` route declarations, Drizzle storage
//! tables and CRUD-shaped handler stubs, one file set per tag.
//!
//! ## Architecture
//!
//! - **[`spec`]** - decoding, normalization into an [`ApiModel`], tag partitioning
//! - **[`generator`]** - type tables, template renderer, emitter, app scaffolding
//! - **[`cli`]** - the `oas-scaffold` command line
//! - **[`error`]** - the error taxonomy shared by every stage
//! - **[`logging`]** - `tracing` subscriber set-up
//!
//! ### Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant User
//!     participant CLI as CLI<br/>(oas-scaffold new)
//!     participant Spec as spec::load_spec
//!     participant Part as spec::partition_by_tag
//!     participant Render as generator::Renderer
//!     participant Sink as OutputSink
//!
//!     User->>CLI: oas-scaffold new petstore --spec openapi.yaml
//!     CLI->>CLI: check app name, spec path, target
//!     CLI->>Spec: load_spec("openapi.yaml")
//!     Spec->>Spec: decode YAML/JSON, normalize
//!     Spec-->>CLI: ApiModel
//!     CLI->>Sink: static app tree, doc/openapi.yaml
//!     CLI->>Render: schema.ts (all schemas)
//!     Render-->>Sink: src/db/schema.ts
//!     CLI->>Part: endpoints
//!     Part-->>CLI: Vec<TagGroup>
//!     loop every tag
//!         CLI->>Render: routes / handlers / router
//!         Render-->>Sink: src/routes/<tag>.*.ts
//!     end
//!     CLI->>Render: route index
//!     Render-->>Sink: src/routes/index.ts
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use oas_scaffold::generator::{generate, MemorySink, OutputLayout};
//! use oas_scaffold::spec::load_spec;
//!
//! let model = load_spec("openapi.yaml".as_ref())?;
//! let mut sink = MemorySink::new();
//! let files = generate(&model, &OutputLayout::default(), &mut sink)?;
//! for path in files {
//!     println!("{}", path.display());
//! }
//! ```
//!
//! ## References
//!
//! Operation parameters and responses must be declared inline: a `$ref` in
//! either position aborts the run with
//! [`ErrorKind::UnsupportedReference`](error::ErrorKind::UnsupportedReference).
//! A `$ref` request body is treated as if no body was declared.

pub mod cli;
pub mod error;
pub mod generator;
pub mod logging;
pub mod spec;

pub use error::{ErrorKind, MissingInput, Result, ScaffoldError};
pub use spec::{load_spec, normalize, partition_by_tag, ApiModel, EndpointDescriptor, SchemaDescriptor};
