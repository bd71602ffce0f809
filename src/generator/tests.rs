#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::error::{ErrorKind, Result, ScaffoldError};
use crate::spec::{normalize, ApiModel};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

fn model(paths: Value) -> ApiModel {
    normalize(&json!({
        "openapi": "3.0.3",
        "info": { "title": "Petstore", "version": "1.0.0" },
        "paths": paths,
        "components": {
            "schemas": {
                "Pet": {
                    "type": "object",
                    "required": ["id", "name"],
                    "properties": {
                        "id": { "type": "integer" },
                        "name": { "type": "string" },
                        "isGoodBoy": { "type": "boolean" }
                    }
                }
            }
        }
    }))
    .unwrap()
}

fn pets_model() -> ApiModel {
    model(json!({
        "/pets": {
            "get": {
                "operationId": "listPets",
                "tags": ["Pets"],
                "parameters": [
                    { "name": "limit", "in": "query", "schema": { "type": "integer" } }
                ],
                "responses": {
                    "200": {
                        "description": "A list of pets",
                        "content": {
                            "application/json": {
                                "schema": { "type": "array", "items": { "type": "object" } }
                            }
                        }
                    }
                }
            }
        },
        "/pets/{petId}": {
            "get": {
                "operationId": "getPet",
                "tags": ["Pets"],
                "parameters": [
                    { "name": "petId", "in": "path", "required": true, "schema": { "type": "string" } }
                ],
                "responses": {
                    "200": { "description": "A pet" },
                    "404": { "description": "Not found" }
                }
            }
        }
    }))
}

fn emit(model: &ApiModel) -> (Vec<PathBuf>, MemorySink) {
    let mut sink = MemorySink::new();
    let written = generate(model, &OutputLayout::default(), &mut sink).unwrap();
    (written, sink)
}

#[test]
fn test_pets_emits_one_file_per_artifact() {
    let (written, sink) = emit(&pets_model());
    assert_eq!(
        written,
        [
            PathBuf::from("src/db/schema.ts"),
            PathBuf::from("src/routes/pets.routes.ts"),
            PathBuf::from("src/routes/pets.handlers.ts"),
            PathBuf::from("src/routes/pets.index.ts"),
            PathBuf::from("src/routes/index.ts"),
        ]
    );
    assert_eq!(sink.len(), 5);
}

#[test]
fn test_routes_file_declares_each_endpoint() {
    let (_, sink) = emit(&pets_model());
    let routes = sink.get("src/routes/pets.routes.ts").unwrap();

    assert_eq!(routes.matches("= createRoute(").count(), 2);
    assert!(routes.contains("const tags = [\"Pets\"];"));
    assert!(routes.contains("export const listPets = createRoute({"));
    assert!(routes.contains("path: \"/pets/{petId}\","));
    assert!(routes.contains("method: \"get\","));
    assert!(routes.contains("limit: z.number().int().optional(),"));
    assert!(routes.contains("petId: z.string(),"));
    assert!(routes.contains("[HttpStatusCodes.OK]: {"));
    assert!(routes.contains("[HttpStatusCodes.NOT_FOUND]: {"));
    assert!(routes.contains("\"application/json\": { schema: z.array(z.unknown()) },"));
    assert!(routes.contains("export type ListPetsRoute = typeof listPets;"));
    assert!(routes.contains("export type GetPetRoute = typeof getPet;"));
}

#[test]
fn test_handlers_file_uses_fetch_shapes() {
    let (_, sink) = emit(&pets_model());
    let handlers = sink.get("src/routes/pets.handlers.ts").unwrap();

    assert_eq!(handlers.matches("AppRouteHandler<").count(), 2);
    assert_eq!(handlers.matches(".findFirst(").count(), 1);
    assert_eq!(handlers.matches(".findMany(").count(), 1);
    assert!(handlers.contains("import { pets } from \"../db/schema\";"));
    assert!(handlers.contains("const { petId } = c.req.valid(\"param\");"));
    assert!(handlers.contains("where: eq(pets.id, petId),"));
    assert!(handlers.contains("} from \"./pets.routes\";"));
}

#[test]
fn test_schema_file_has_table_and_validators() {
    let (_, sink) = emit(&pets_model());
    let schema = sink.get("src/db/schema.ts").unwrap();

    assert!(schema.contains("// Storage schema for Petstore 1.0.0."));
    assert!(schema.contains("export const pet = sqliteTable(\"pet\", {"));
    assert!(schema.contains("  id: integer(\"id\").primaryKey(),"));
    assert!(schema.contains("  name: text(\"name\").notNull(),"));
    assert!(schema.contains("  isGoodBoy: integer(\"is_good_boy\", { mode: \"boolean\" }),"));
    assert!(!schema.contains("autoIncrement"));
    assert!(schema.contains("export const selectPetSchema = createSelectSchema(pet);"));
    assert!(schema.contains("export const insertPetSchema = createInsertSchema(pet).omit({ id: true });"));
    assert!(schema.contains("export const patchPetSchema = insertPetSchema.partial();"));
}

#[test]
fn test_router_and_index_bind_everything() {
    let (_, sink) = emit(&pets_model());
    let router = sink.get("src/routes/pets.index.ts").unwrap();
    assert!(router.contains("import * as handlers from \"./pets.handlers\";"));
    assert!(router.contains(".openapi(routes.listPets, handlers.listPets)"));
    assert!(router.contains(".openapi(routes.getPet, handlers.getPet);"));

    let index = sink.get("src/routes/index.ts").unwrap();
    assert!(index.contains("import pets from \"./pets.index\";"));
    assert!(index.contains("export const routers = ["));
}

#[test]
fn test_groups_follow_first_tag_in_document_order() {
    let model = model(json!({
        "/users": {
            "get": { "tags": ["Users", "Pets"], "responses": {} }
        },
        "/pets": {
            "get": { "tags": ["Pets"], "responses": {} }
        },
        "/health": {
            "get": { "responses": { "200": { "description": "ok" } } }
        }
    }));
    let (written, sink) = emit(&model);

    let routes: Vec<_> = written
        .iter()
        .filter(|p| p.to_string_lossy().ends_with(".routes.ts"))
        .cloned()
        .collect();
    assert_eq!(
        routes,
        [
            PathBuf::from("src/routes/users.routes.ts"),
            PathBuf::from("src/routes/pets.routes.ts"),
            PathBuf::from("src/routes/default.routes.ts"),
        ]
    );

    let users = sink.get("src/routes/users.routes.ts").unwrap();
    assert!(users.contains("export const gETusers = createRoute({"));
    let health = sink.get("src/routes/default.routes.ts").unwrap();
    assert!(health.contains("export const gEThealth = createRoute({"));

    let index = sink.get("src/routes/index.ts").unwrap();
    let users_at = index.find("import users").unwrap();
    let pets_at = index.find("import pets").unwrap();
    let default_at = index.find("import default_ from").unwrap();
    assert!(users_at < pets_at && pets_at < default_at);
}

#[test]
fn test_method_branches() {
    let model = model(json!({
        "/pets": {
            "post": { "operationId": "createPet", "tags": ["Pets"], "responses": {} }
        },
        "/pets/{id}": {
            "patch": { "operationId": "updatePet", "tags": ["Pets"], "responses": {} },
            "delete": { "operationId": "deletePet", "tags": ["Pets"], "responses": {} },
            "put": { "operationId": "replacePet", "tags": ["Pets"], "responses": {} }
        }
    }));
    let (_, sink) = emit(&model);
    let handlers = sink.get("src/routes/pets.handlers.ts").unwrap();

    assert!(handlers.contains("await db.insert(pets).values(body).returning();"));
    assert!(handlers.contains(".update(pets)"));
    assert!(handlers.contains("await db.delete(pets).where(eq(pets.id, id));"));
    assert!(handlers.contains("return c.body(null, HttpStatusCodes.NO_CONTENT);"));
    assert_eq!(handlers.matches("\"Not implemented\"").count(), 1);
}

#[test]
fn test_unknown_status_keys() {
    let model = model(json!({
        "/teapot": {
            "get": {
                "tags": ["Misc"],
                "responses": {
                    "418": { "description": "short and stout" },
                    "default": { "description": "anything else" }
                }
            }
        }
    }));
    let (_, sink) = emit(&model);
    let routes = sink.get("src/routes/misc.routes.ts").unwrap();
    assert!(routes.contains("[418]: {"));
    assert!(routes.contains("[\"default\"]: {"));
}

#[test]
fn test_zero_endpoints_writes_nothing() {
    let model = model(json!({}));
    let mut sink = MemorySink::new();
    let err = generate(&model, &OutputLayout::default(), &mut sink).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingInput);
    assert!(sink.is_empty());
}

#[test]
fn test_custom_layout_paths_and_imports() {
    let layout = OutputLayout {
        extension: "mts".into(),
        src_dir: "app".into(),
        routes_dir: "api/routes".into(),
        db_dir: "storage".into(),
    };
    let mut sink = MemorySink::new();
    generate(&pets_model(), &layout, &mut sink).unwrap();

    assert!(sink.get("app/storage/schema.mts").is_some());
    let handlers = sink.get("app/api/routes/pets.handlers.mts").unwrap();
    assert!(handlers.contains("import db from \"../../storage\";"));
    assert!(handlers.contains("from \"../../lib/types\";"));
}

#[test]
fn test_path_like_tag_stays_inside_routes_dir() {
    let model = model(json!({
        "/x": {
            "get": { "operationId": "getX", "tags": ["../../../pwned"], "responses": {} }
        }
    }));
    let (written, sink) = emit(&model);
    assert!(written.contains(&PathBuf::from("src/routes/_________pwned.routes.ts")));
    assert!(sink.paths().all(|p| p.starts_with("src")));

    let index = sink.get("src/routes/index.ts").unwrap();
    assert!(index.contains("import _________pwned from \"./_________pwned.index\";"));
    let routes = sink.get("src/routes/_________pwned.routes.ts").unwrap();
    assert!(routes.contains("const tags = [\"../../../pwned\"];"));
}

#[test]
fn test_tags_differing_in_case_are_rejected_before_writing() {
    let model = model(json!({
        "/a": { "get": { "operationId": "a", "tags": ["Pets"], "responses": {} } },
        "/b": { "get": { "operationId": "b", "tags": ["pets"], "responses": {} } }
    }));
    let mut sink = MemorySink::new();
    let err = generate(&model, &OutputLayout::default(), &mut sink).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidDocument);
    assert!(err.to_string().contains("tags 'Pets' and 'pets'"), "{err}");
    assert!(sink.is_empty());
}

/// Accepts `remaining` writes, then fails every write after that.
struct FailingSink {
    remaining: usize,
    inner: MemorySink,
}

impl OutputSink for FailingSink {
    fn write_bytes(&mut self, relative: &Path, contents: &[u8]) -> Result<()> {
        if self.remaining == 0 {
            return Err(ScaffoldError::io(
                relative,
                std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            ));
        }
        self.remaining -= 1;
        self.inner.write_bytes(relative, contents)
    }
}

#[test]
fn test_sink_failure_keeps_earlier_files() {
    let mut sink = FailingSink {
        remaining: 2,
        inner: MemorySink::new(),
    };
    let err = generate(&pets_model(), &OutputLayout::default(), &mut sink).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(sink.inner.len(), 2);
    assert!(sink.inner.get("src/routes/pets.routes.ts").is_some());
    assert!(sink.inner.get("src/routes/pets.handlers.ts").is_none());
}

#[test]
fn test_rendering_is_deterministic() {
    let model = pets_model();
    let renderer = Renderer::new().unwrap();
    let layout = OutputLayout::default();
    let mut first = MemorySink::new();
    let mut second = MemorySink::new();
    Emitter::new(&renderer, &layout).emit(&model, &mut first).unwrap();
    Emitter::new(&renderer, &layout).emit(&model, &mut second).unwrap();
    for path in first.paths() {
        assert_eq!(first.get(path), second.get(path));
    }
}
