use std::collections::HashMap;
use std::path::{Path, PathBuf};

use minijinja::context;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{MissingInput, Result, ScaffoldError};
use crate::generator::config::OutputLayout;
use crate::generator::sink::OutputSink;
use crate::generator::templates::{identifier, Renderer, TemplateKind};
use crate::spec::{
    load_spec, partition_by_tag, ApiModel, EndpointDescriptor, ParameterDescriptor,
    ParameterLocation, TagGroup,
};

/// An endpoint as the per-tag templates see it: the descriptor's own fields
/// plus its parameters split by location.
#[derive(Debug, Serialize)]
struct EndpointView<'a> {
    #[serde(flatten)]
    endpoint: &'a EndpointDescriptor,
    path_params: Vec<&'a ParameterDescriptor>,
    query_params: Vec<&'a ParameterDescriptor>,
    header_params: Vec<&'a ParameterDescriptor>,
}

impl<'a> EndpointView<'a> {
    fn new(endpoint: &'a EndpointDescriptor) -> Self {
        Self {
            endpoint,
            path_params: endpoint.parameters_in(ParameterLocation::Path).collect(),
            query_params: endpoint.parameters_in(ParameterLocation::Query).collect(),
            header_params: endpoint.parameters_in(ParameterLocation::Header).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct RouteIndexEntry {
    binding: String,
    module: String,
}

/// Fail when two tag groups would share output files or an import binding,
/// e.g. `Pets` and `pets`.
pub(crate) fn check_tag_stems(groups: &[TagGroup<'_>]) -> Result<()> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    for group in groups {
        let binding = identifier(&OutputLayout::tag_stem(group.tag));
        if let Some(first) = seen.insert(binding.clone(), group.tag) {
            return Err(ScaffoldError::invalid(
                "tags",
                format!(
                    "tags '{first}' and '{}' both map to the output name '{binding}'",
                    group.tag
                ),
            ));
        }
    }
    Ok(())
}

/// Renders an [`ApiModel`] into the endpoint- and schema-derived files.
///
/// Order of work: schema file, then per tag group the routes, handlers and
/// router files, then the route index. Every file goes through the sink as
/// soon as it is rendered.
#[derive(Debug)]
pub struct Emitter<'a> {
    renderer: &'a Renderer,
    layout: &'a OutputLayout,
}

impl<'a> Emitter<'a> {
    pub fn new(renderer: &'a Renderer, layout: &'a OutputLayout) -> Self {
        Self { renderer, layout }
    }

    /// Emit every generated file for `model` into `sink`.
    ///
    /// Returns the written paths in write order. Fails with
    /// [`MissingInput::NoEndpoints`] before writing anything when the model
    /// has no endpoints, and with `InvalidDocument` when two tags map to the
    /// same file stem. A sink failure aborts the run and leaves the files
    /// already written in place.
    pub fn emit(&self, model: &ApiModel, sink: &mut dyn OutputSink) -> Result<Vec<PathBuf>> {
        if model.endpoints.is_empty() {
            return Err(MissingInput::NoEndpoints.into());
        }

        let groups = partition_by_tag(&model.endpoints);
        check_tag_stems(&groups)?;
        info!(
            endpoints = model.endpoints.len(),
            schemas = model.schemas.len(),
            groups = groups.len(),
            "emitting project files"
        );

        let mut written = Vec::new();
        let schema = self.renderer.render(
            TemplateKind::Schema,
            context! {
                schemas => &model.schemas,
                metadata => &model.metadata,
            },
        )?;
        write(sink, self.layout.schema_path(), &schema, &mut written)?;

        for group in &groups {
            self.emit_group(group, sink, &mut written)?;
        }

        let entries: Vec<RouteIndexEntry> = groups
            .iter()
            .map(|g| RouteIndexEntry {
                binding: identifier(&OutputLayout::tag_stem(g.tag)),
                module: self.layout.router_module(g.tag),
            })
            .collect();
        let index = self
            .renderer
            .render(TemplateKind::RouteIndex, context! { groups => entries })?;
        write(sink, self.layout.route_index_path(), &index, &mut written)?;

        Ok(written)
    }

    fn emit_group(
        &self,
        group: &TagGroup<'_>,
        sink: &mut dyn OutputSink,
        written: &mut Vec<PathBuf>,
    ) -> Result<()> {
        let tag = group.tag;
        let endpoints: Vec<EndpointView<'_>> =
            group.endpoints.iter().map(|e| EndpointView::new(e)).collect();
        debug!(
            tag,
            operations = ?group.endpoints.iter().map(|e| e.operation_id.as_str()).collect::<Vec<_>>(),
            "rendering tag group"
        );

        let routes = self.renderer.render(
            TemplateKind::Routes,
            context! { tag => tag, endpoints => &endpoints },
        )?;
        write(sink, self.layout.routes_path(tag), &routes, written)?;

        let handlers = self.renderer.render(
            TemplateKind::Handlers,
            context! {
                table => identifier(&OutputLayout::tag_stem(tag)),
                src_root => self.layout.src_root_import(),
                db_module => self.layout.db_module(),
                routes_module => self.layout.routes_module(tag),
                endpoints => &endpoints,
            },
        )?;
        write(sink, self.layout.handlers_path(tag), &handlers, written)?;

        let router = self.renderer.render(
            TemplateKind::Router,
            context! {
                src_root => self.layout.src_root_import(),
                handlers_module => self.layout.handlers_module(tag),
                routes_module => self.layout.routes_module(tag),
                endpoints => &endpoints,
            },
        )?;
        write(sink, self.layout.router_path(tag), &router, written)?;
        Ok(())
    }
}

fn write(
    sink: &mut dyn OutputSink,
    path: PathBuf,
    contents: &str,
    written: &mut Vec<PathBuf>,
) -> Result<()> {
    sink.write(&path, contents)?;
    debug!(path = %path.display(), "emitted");
    written.push(path);
    Ok(())
}

/// Build a renderer and emit `model` with `layout`.
pub fn generate(
    model: &ApiModel,
    layout: &OutputLayout,
    sink: &mut dyn OutputSink,
) -> Result<Vec<PathBuf>> {
    let renderer = Renderer::new()?;
    Emitter::new(&renderer, layout).emit(model, sink)
}

/// Load, normalize and emit the spec at `spec_path`.
pub fn generate_from_spec(
    spec_path: &Path,
    layout: &OutputLayout,
    sink: &mut dyn OutputSink,
) -> Result<Vec<PathBuf>> {
    let model = load_spec(spec_path)?;
    generate(&model, layout, sink)
}
