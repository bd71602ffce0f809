//! Application scaffolding around the emitted files.
//!
//! [`plan_app`] runs every check that can fail before anything is written;
//! [`AppPlan::write_to`] then lays down the static app tree, a copy of the
//! spec and the generated files through an [`OutputSink`].

use std::fs;
use std::path::{Path, PathBuf};

use minijinja::context;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};
use walkdir::WalkDir;

use super::generate::{check_tag_stems, Emitter};
use crate::error::{MissingInput, Result, ScaffoldError};
use crate::generator::config::{resolve_config, OutputLayout};
use crate::generator::sink::{FsSink, MemorySink, OutputSink};
use crate::generator::templates::Renderer;
use crate::spec::{load_spec, partition_by_tag, ApiModel, SpecFormat};

static APP_NAME_RE: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$"));

/// Suffix marking a file of the app tree as a template.
pub const TEMPLATE_SUFFIX: &str = ".jinja";

/// The built-in application tree. Paths use the default layout and are
/// remapped onto the configured one when written.
const APP_FILES: &[(&str, &str)] = &[
    ("package.json.jinja", include_str!("../../../templates/app/package.json.jinja")),
    ("tsconfig.json.jinja", include_str!("../../../templates/app/tsconfig.json.jinja")),
    ("gitignore", include_str!("../../../templates/app/gitignore")),
    ("drizzle.config.ts.jinja", include_str!("../../../templates/app/drizzle.config.ts.jinja")),
    ("README.md.jinja", include_str!("../../../templates/app/README.md.jinja")),
    ("src/index.ts", include_str!("../../../templates/app/src/index.ts")),
    ("src/app.ts.jinja", include_str!("../../../templates/app/src/app.ts.jinja")),
    ("src/db/index.ts", include_str!("../../../templates/app/src/db/index.ts")),
    ("src/lib/create-app.ts", include_str!("../../../templates/app/src/lib/create-app.ts")),
    ("src/lib/types.ts", include_str!("../../../templates/app/src/lib/types.ts")),
];

/// Check an application name: letters, digits, `-` and `_`, starting with a
/// letter or digit.
pub fn validate_app_name(name: &str) -> Result<()> {
    let valid = match APP_NAME_RE.as_ref() {
        Ok(re) => re.is_match(name),
        Err(_) => false,
    };
    if valid {
        Ok(())
    } else {
        Err(MissingInput::InvalidAppName(name.to_string()).into())
    }
}

/// Inputs of `oas-scaffold new`.
#[derive(Debug, Clone)]
pub struct ScaffoldOptions {
    pub app_name: String,
    pub spec_path: PathBuf,
    /// Parent of the application directory
    pub output_dir: PathBuf,
    /// Explicit `scaffold.toml`; otherwise the one next to the spec, if any
    pub config_path: Option<PathBuf>,
    /// User app tree replacing the built-in one
    pub template_dir: Option<PathBuf>,
    pub dry_run: bool,
}

impl ScaffoldOptions {
    pub fn new(app_name: impl Into<String>, spec_path: impl Into<PathBuf>) -> Self {
        Self {
            app_name: app_name.into(),
            spec_path: spec_path.into(),
            output_dir: PathBuf::from("."),
            config_path: None,
            template_dir: None,
            dry_run: false,
        }
    }

    /// `<output_dir>/<app_name>`
    pub fn target_dir(&self) -> PathBuf {
        self.output_dir.join(&self.app_name)
    }
}

/// Everything needed to write an application, validated up front.
#[derive(Debug)]
pub struct AppPlan {
    pub app_name: String,
    pub target: PathBuf,
    pub spec_path: PathBuf,
    pub layout: OutputLayout,
    pub model: ApiModel,
    pub template_dir: Option<PathBuf>,
}

/// Outcome of a scaffolding run.
#[derive(Debug)]
pub struct ScaffoldReport {
    pub target: PathBuf,
    /// Written files relative to `target`, in write order
    pub files: Vec<PathBuf>,
    pub dry_run: bool,
}

/// Validate inputs and build the model, in this order: app name, spec
/// presence, target absence, configuration, decode and normalize, endpoint
/// count, distinct tag file stems. Nothing is written.
pub fn plan_app(options: &ScaffoldOptions) -> Result<AppPlan> {
    validate_app_name(&options.app_name)?;
    if !options.spec_path.exists() {
        return Err(MissingInput::SpecNotFound(options.spec_path.clone()).into());
    }
    let target = options.target_dir();
    if target.exists() {
        return Err(MissingInput::TargetExists(target).into());
    }
    let config = resolve_config(options.config_path.as_deref(), &options.spec_path)?;
    let model = load_spec(&options.spec_path)?;
    if model.endpoints.is_empty() {
        return Err(MissingInput::NoEndpoints.into());
    }
    check_tag_stems(&partition_by_tag(&model.endpoints))?;
    Ok(AppPlan {
        app_name: options.app_name.clone(),
        target,
        spec_path: options.spec_path.clone(),
        layout: config.output,
        model,
        template_dir: options.template_dir.clone(),
    })
}

impl AppPlan {
    /// Write the app tree, the spec copy and the generated files.
    pub fn write_to(&self, sink: &mut dyn OutputSink) -> Result<Vec<PathBuf>> {
        let renderer = Renderer::new()?;
        let mut written = match &self.template_dir {
            Some(dir) => self.write_template_dir(&renderer, dir, sink)?,
            None => self.write_builtin_tree(&renderer, sink)?,
        };
        written.push(self.write_spec_copy(sink)?);
        written.extend(Emitter::new(&renderer, &self.layout).emit(&self.model, sink)?);
        Ok(written)
    }

    /// Write into the target directory, or into memory for a dry run.
    pub fn apply(&self, dry_run: bool) -> Result<ScaffoldReport> {
        let files = if dry_run {
            self.write_to(&mut MemorySink::new())?
        } else {
            self.write_to(&mut FsSink::new(&self.target))?
        };
        info!(
            target = %self.target.display(),
            files = files.len(),
            dry_run,
            "scaffold complete"
        );
        Ok(ScaffoldReport {
            target: self.target.clone(),
            files,
            dry_run,
        })
    }

    fn app_context(&self) -> minijinja::Value {
        context! {
            app_name => &self.app_name,
            metadata => &self.model.metadata,
            layout => &self.layout,
        }
    }

    fn write_builtin_tree(
        &self,
        renderer: &Renderer,
        sink: &mut dyn OutputSink,
    ) -> Result<Vec<PathBuf>> {
        let ctx = self.app_context();
        let mut written = Vec::with_capacity(APP_FILES.len());
        for (name, body) in APP_FILES {
            let relative = self.output_path(name);
            let contents = match name.strip_suffix(TEMPLATE_SUFFIX) {
                Some(_) => renderer.render_str(name, body, &ctx)?,
                None => (*body).to_string(),
            };
            sink.write(&relative, &contents)?;
            written.push(relative);
        }
        debug!(files = written.len(), "wrote built-in app tree");
        Ok(written)
    }

    fn write_template_dir(
        &self,
        renderer: &Renderer,
        dir: &Path,
        sink: &mut dyn OutputSink,
    ) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(ScaffoldError::io(
                dir,
                std::io::Error::new(std::io::ErrorKind::NotFound, "template directory not found"),
            ));
        }
        let ctx = self.app_context();
        let mut written = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| ScaffoldError::io(dir, e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(dir) else {
                continue;
            };
            let name = relative.to_string_lossy().replace('\\', "/");
            let out = self.output_path(&name);
            if name.ends_with(TEMPLATE_SUFFIX) {
                let body = fs::read_to_string(entry.path())
                    .map_err(|e| ScaffoldError::io(entry.path(), e))?;
                sink.write(&out, &renderer.render_str(&name, &body, &ctx)?)?;
            } else {
                let bytes =
                    fs::read(entry.path()).map_err(|e| ScaffoldError::io(entry.path(), e))?;
                sink.write_bytes(&out, &bytes)?;
            }
            written.push(out);
        }
        info!(dir = %dir.display(), files = written.len(), "copied template directory");
        Ok(written)
    }

    fn write_spec_copy(&self, sink: &mut dyn OutputSink) -> Result<PathBuf> {
        let bytes = fs::read(&self.spec_path).map_err(|e| ScaffoldError::io(&self.spec_path, e))?;
        let relative = Path::new("doc")
            .join(format!("openapi.{}", SpecFormat::from_path(&self.spec_path).name()));
        sink.write_bytes(&relative, &bytes)?;
        Ok(relative)
    }

    /// Map an app tree path onto the configured layout: drop the template
    /// suffix, restore the leading dot of `gitignore`, and move `src/` and
    /// `src/db/` to the configured source and database directories.
    fn output_path(&self, name: &str) -> PathBuf {
        let name = name.strip_suffix(TEMPLATE_SUFFIX).unwrap_or(name);
        let name = if name == "gitignore" { ".gitignore" } else { name };
        let src = Path::new(&self.layout.src_dir);
        if let Some(rest) = name.strip_prefix("src/db/") {
            src.join(&self.layout.db_dir).join(rest)
        } else if let Some(rest) = name.strip_prefix("src/") {
            src.join(rest)
        } else {
            PathBuf::from(name)
        }
    }
}

/// Plan and write an application. A dry run writes into memory and leaves
/// the file system untouched.
pub fn create_app(options: &ScaffoldOptions) -> Result<ScaffoldReport> {
    plan_app(options)?.apply(options.dry_run)
}
