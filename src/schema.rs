#![deny(missing_docs)]

//! # Schema Annotation
//!
//! OpenAPI has no tri-state notion: a parameter or object property is either
//! required or it is not. An omittable declaration is therefore documented
//! as its inner type's schema with `required: false`, and the wrapper never
//! appears in a document. The [`PartialSchema`] and [`ToSchema`]
//! implementations keep derived schemas transparent, while
//! [`SchemaRegistry`] rewrites documents whose parameters were declared
//! through extractors the doc generator cannot see into.

use std::borrow::Cow;

use utoipa::openapi::path::{Operation, Parameter, ParameterIn, PathItem};
use utoipa::openapi::schema::Schema;
use utoipa::openapi::{OpenApi, RefOr, Required};
use utoipa::{PartialSchema, ToSchema};

use crate::omittable::Omittable;

impl<T: PartialSchema> PartialSchema for Omittable<T> {
    fn schema() -> RefOr<Schema> {
        T::schema()
    }
}

impl<T: ToSchema> ToSchema for Omittable<T> {
    fn name() -> Cow<'static, str> {
        T::name()
    }

    // The inner type is a referenced schema here, so its own entry goes in
    // before the recursive collection of what it references.
    fn schemas(schemas: &mut Vec<(String, RefOr<Schema>)>) {
        schemas.push((T::name().to_string(), T::schema()));
        T::schemas(schemas);
    }
}

struct ParameterTarget {
    path: Option<String>,
    name: String,
    schema: RefOr<Schema>,
}

impl ParameterTarget {
    fn matches(&self, path: &str, parameter: &str) -> bool {
        self.name == parameter && self.path.as_deref().map_or(true, |scoped| scoped == path)
    }
}

struct FieldTarget {
    schema: String,
    property: String,
    replacement: RefOr<Schema>,
}

/// Rewrites OpenAPI documents so registered declarations read as optional.
///
/// Handlers that resolve parameters by name leave no trace in a generated
/// document, so their parameters default to `required: true` with whatever
/// schema the generator guessed. Register each omittable declaration here,
/// then run [`apply`](SchemaRegistry::apply) once over the finished document
/// during startup: matching query parameters are marked not required and
/// given the registered inner type's schema, and matching object properties
/// are dropped from their schema's `required` list.
///
/// The inner type's schema is captured at registration time, so the registry
/// holds plain data and applying it is deterministic. Applying the same
/// registry twice leaves the document unchanged after the first pass.
#[derive(Default)]
pub struct SchemaRegistry {
    parameters: Vec<ParameterTarget>,
    fields: Vec<FieldTarget>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a query parameter, matched by name on every path.
    ///
    /// `T` is the inner type the parameter converts into; its schema
    /// replaces whatever the document declared.
    pub fn register_parameter<T: PartialSchema>(&mut self, name: impl Into<String>) {
        self.register_parameter_schema(name, T::schema());
    }

    /// Registers a query parameter, matched by name on one path only.
    pub fn register_parameter_at<T: PartialSchema>(
        &mut self,
        path: impl Into<String>,
        name: impl Into<String>,
    ) {
        self.register_parameter_schema_at(path, name, T::schema());
    }

    /// Registers a query parameter with an explicit replacement schema.
    ///
    /// For inner types without a [`PartialSchema`] implementation, such as
    /// `uuid::Uuid`, build the schema directly:
    ///
    /// ```
    /// use omittable::SchemaRegistry;
    /// use utoipa::openapi::schema::{KnownFormat, ObjectBuilder, Schema, SchemaFormat, Type};
    /// use utoipa::openapi::RefOr;
    ///
    /// let mut registry = SchemaRegistry::new();
    /// registry.register_parameter_schema(
    ///     "template",
    ///     RefOr::T(Schema::Object(
    ///         ObjectBuilder::new()
    ///             .schema_type(Type::String)
    ///             .format(Some(SchemaFormat::KnownFormat(KnownFormat::Uuid)))
    ///             .build(),
    ///     )),
    /// );
    /// ```
    pub fn register_parameter_schema(
        &mut self,
        name: impl Into<String>,
        schema: impl Into<RefOr<Schema>>,
    ) {
        self.parameters.push(ParameterTarget {
            path: None,
            name: name.into(),
            schema: schema.into(),
        });
    }

    /// Registers a query parameter with an explicit replacement schema,
    /// matched by name on one path only.
    pub fn register_parameter_schema_at(
        &mut self,
        path: impl Into<String>,
        name: impl Into<String>,
        schema: impl Into<RefOr<Schema>>,
    ) {
        self.parameters.push(ParameterTarget {
            path: Some(path.into()),
            name: name.into(),
            schema: schema.into(),
        });
    }

    /// Registers an object property on the named component schema.
    ///
    /// The property is removed from the schema's `required` list and its
    /// schema is replaced with `T`'s.
    pub fn register_field<T: PartialSchema>(
        &mut self,
        schema: impl Into<String>,
        property: impl Into<String>,
    ) {
        self.register_field_schema(schema, property, T::schema());
    }

    /// Registers an object property with an explicit replacement schema.
    pub fn register_field_schema(
        &mut self,
        schema: impl Into<String>,
        property: impl Into<String>,
        replacement: impl Into<RefOr<Schema>>,
    ) {
        self.fields.push(FieldTarget {
            schema: schema.into(),
            property: property.into(),
            replacement: replacement.into(),
        });
    }

    /// Rewrites `openapi` in place according to the registrations.
    ///
    /// Registrations are applied in order; when two target the same
    /// parameter, the later one wins. A registration that matches nothing
    /// logs a warning, since that usually means a renamed parameter or
    /// schema.
    pub fn apply(&self, openapi: &mut OpenApi) {
        let mut parameter_hits = vec![0usize; self.parameters.len()];
        let mut field_hits = vec![0usize; self.fields.len()];

        for (path, item) in openapi.paths.paths.iter_mut() {
            if let Some(parameters) = item.parameters.as_mut() {
                self.annotate_parameters(path, parameters, &mut parameter_hits);
            }
            for operation in operations_mut(item).into_iter().flatten() {
                if let Some(parameters) = operation.parameters.as_mut() {
                    self.annotate_parameters(path, parameters, &mut parameter_hits);
                }
            }
        }

        if let Some(components) = openapi.components.as_mut() {
            for (target, hits) in self.fields.iter().zip(field_hits.iter_mut()) {
                let Some(RefOr::T(Schema::Object(object))) =
                    components.schemas.get_mut(&target.schema)
                else {
                    continue;
                };
                if let Some(property) = object.properties.get_mut(&target.property) {
                    *property = target.replacement.clone();
                    object.required.retain(|required| required != &target.property);
                    *hits += 1;
                }
            }
        }

        log::debug!(
            "annotated {} optional declarations",
            parameter_hits.iter().sum::<usize>() + field_hits.iter().sum::<usize>()
        );

        for (target, hits) in self.parameters.iter().zip(&parameter_hits) {
            if *hits == 0 {
                match &target.path {
                    Some(path) => {
                        log::warn!("no query parameter '{}' found under '{}'", target.name, path)
                    }
                    None => log::warn!("no query parameter '{}' found in the document", target.name),
                }
            }
        }
        for (target, hits) in self.fields.iter().zip(&field_hits) {
            if *hits == 0 {
                log::warn!(
                    "no property '{}' found on schema '{}'",
                    target.property,
                    target.schema
                );
            }
        }
    }

    fn annotate_parameters(&self, path: &str, parameters: &mut [Parameter], hits: &mut [usize]) {
        for parameter in parameters.iter_mut() {
            if !matches!(parameter.parameter_in, ParameterIn::Query) {
                continue;
            }
            for (target, hits) in self.parameters.iter().zip(hits.iter_mut()) {
                if target.matches(path, &parameter.name) {
                    parameter.required = Required::False;
                    parameter.schema = Some(target.schema.clone());
                    *hits += 1;
                }
            }
        }
    }
}

fn operations_mut(item: &mut PathItem) -> [&mut Option<Operation>; 8] {
    [
        &mut item.get,
        &mut item.put,
        &mut item.post,
        &mut item.delete,
        &mut item.options,
        &mut item.head,
        &mut item.patch,
        &mut item.trace,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use utoipa::openapi::schema::{KnownFormat, ObjectBuilder, SchemaFormat, Type};

    fn uuid_schema() -> RefOr<Schema> {
        RefOr::T(Schema::Object(
            ObjectBuilder::new()
                .schema_type(Type::String)
                .format(Some(SchemaFormat::KnownFormat(KnownFormat::Uuid)))
                .build(),
        ))
    }

    fn people_document() -> OpenApi {
        serde_json::from_value(json!({
            "openapi": "3.1.0",
            "info": { "title": "People", "version": "1.0.0" },
            "paths": {
                "/people": {
                    "get": {
                        "parameters": [
                            {
                                "name": "required",
                                "in": "query",
                                "required": true,
                                "schema": { "type": "string" }
                            },
                            {
                                "name": "omittable",
                                "in": "query",
                                "required": true,
                                "schema": { "type": "string" }
                            }
                        ],
                        "responses": { "200": { "description": "ok" } }
                    }
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_registered_parameter_reads_as_optional() {
        let mut openapi = people_document();
        let mut registry = SchemaRegistry::new();
        registry.register_parameter::<String>("omittable");
        registry.apply(&mut openapi);

        let doc = serde_json::to_value(&openapi).unwrap();
        let parameters = &doc["paths"]["/people"]["get"]["parameters"];
        assert_eq!(parameters[0]["name"], "required");
        assert_eq!(parameters[0]["required"], json!(true));
        assert_eq!(parameters[1]["name"], "omittable");
        assert_eq!(parameters[1]["required"], json!(false));
        assert_eq!(parameters[1]["schema"], json!({ "type": "string" }));
    }

    #[test]
    fn test_uuid_parameter_documents_string_with_uuid_format() {
        let mut openapi: OpenApi = serde_json::from_value(json!({
            "openapi": "3.1.0",
            "info": { "title": "People", "version": "1.0.0" },
            "paths": {
                "/people": {
                    "post": {
                        "parameters": [
                            {
                                "name": "template",
                                "in": "query",
                                "required": true,
                                "schema": { "type": "string" }
                            }
                        ],
                        "responses": { "201": { "description": "created" } }
                    }
                }
            }
        }))
        .unwrap();

        let mut registry = SchemaRegistry::new();
        registry.register_parameter_schema("template", uuid_schema());
        registry.apply(&mut openapi);

        let doc = serde_json::to_value(&openapi).unwrap();
        let parameter = &doc["paths"]["/people"]["post"]["parameters"][0];
        assert_eq!(parameter["required"], json!(false));
        assert_eq!(parameter["schema"], json!({ "type": "string", "format": "uuid" }));
    }

    #[test]
    fn test_path_scoped_registration_leaves_other_paths_alone() {
        let mut openapi: OpenApi = serde_json::from_value(json!({
            "openapi": "3.1.0",
            "info": { "title": "People", "version": "1.0.0" },
            "paths": {
                "/people": {
                    "get": {
                        "parameters": [
                            {
                                "name": "note",
                                "in": "query",
                                "required": true,
                                "schema": { "type": "string" }
                            }
                        ],
                        "responses": { "200": { "description": "ok" } }
                    }
                },
                "/teams": {
                    "get": {
                        "parameters": [
                            {
                                "name": "note",
                                "in": "query",
                                "required": true,
                                "schema": { "type": "string" }
                            }
                        ],
                        "responses": { "200": { "description": "ok" } }
                    }
                }
            }
        }))
        .unwrap();

        let mut registry = SchemaRegistry::new();
        registry.register_parameter_at::<String>("/people", "note");
        registry.apply(&mut openapi);

        let doc = serde_json::to_value(&openapi).unwrap();
        assert_eq!(
            doc["paths"]["/people"]["get"]["parameters"][0]["required"],
            json!(false)
        );
        assert_eq!(
            doc["paths"]["/teams"]["get"]["parameters"][0]["required"],
            json!(true)
        );
    }

    #[test]
    fn test_only_query_parameters_are_annotated() {
        let mut openapi: OpenApi = serde_json::from_value(json!({
            "openapi": "3.1.0",
            "info": { "title": "People", "version": "1.0.0" },
            "paths": {
                "/people/{note}": {
                    "get": {
                        "parameters": [
                            {
                                "name": "note",
                                "in": "path",
                                "required": true,
                                "schema": { "type": "string" }
                            }
                        ],
                        "responses": { "200": { "description": "ok" } }
                    }
                }
            }
        }))
        .unwrap();

        let mut registry = SchemaRegistry::new();
        registry.register_parameter::<String>("note");
        registry.apply(&mut openapi);

        let doc = serde_json::to_value(&openapi).unwrap();
        assert_eq!(
            doc["paths"]["/people/{note}"]["get"]["parameters"][0]["required"],
            json!(true)
        );
    }

    #[test]
    fn test_every_operation_of_a_path_is_covered() {
        let operation = json!({
            "parameters": [
                {
                    "name": "omittable",
                    "in": "query",
                    "required": true,
                    "schema": { "type": "string" }
                }
            ],
            "responses": { "200": { "description": "ok" } }
        });
        let mut openapi: OpenApi = serde_json::from_value(json!({
            "openapi": "3.1.0",
            "info": { "title": "People", "version": "1.0.0" },
            "paths": {
                "/people": {
                    "get": operation.clone(),
                    "put": operation.clone(),
                    "patch": operation.clone(),
                    "delete": operation
                }
            }
        }))
        .unwrap();

        let mut registry = SchemaRegistry::new();
        registry.register_parameter::<String>("omittable");
        registry.apply(&mut openapi);

        let doc = serde_json::to_value(&openapi).unwrap();
        for method in ["get", "put", "patch", "delete"] {
            assert_eq!(
                doc["paths"]["/people"][method]["parameters"][0]["required"],
                json!(false),
                "method {} was not annotated",
                method
            );
        }
    }

    #[test]
    fn test_applying_twice_changes_nothing_further() {
        let mut openapi = people_document();
        let mut registry = SchemaRegistry::new();
        registry.register_parameter::<String>("omittable");

        registry.apply(&mut openapi);
        let first = serde_json::to_value(&openapi).unwrap();
        registry.apply(&mut openapi);
        let second = serde_json::to_value(&openapi).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_registered_field_leaves_the_required_list() {
        let mut openapi: OpenApi = serde_json::from_value(json!({
            "openapi": "3.1.0",
            "info": { "title": "People", "version": "1.0.0" },
            "paths": {},
            "components": {
                "schemas": {
                    "PersonPatch": {
                        "type": "object",
                        "required": ["name", "age"],
                        "properties": {
                            "name": { "type": "string" },
                            "age": { "type": "integer" }
                        }
                    }
                }
            }
        }))
        .unwrap();

        let mut registry = SchemaRegistry::new();
        registry.register_field::<Option<String>>("PersonPatch", "name");
        registry.apply(&mut openapi);

        let doc = serde_json::to_value(&openapi).unwrap();
        let schema = &doc["components"]["schemas"]["PersonPatch"];
        assert_eq!(schema["required"], json!(["age"]));
        assert_eq!(
            schema["properties"]["name"],
            serde_json::to_value(<Option<String> as PartialSchema>::schema()).unwrap()
        );
        assert_eq!(schema["properties"]["age"], json!({ "type": "integer" }));
    }

    #[test]
    fn test_field_registered_with_an_explicit_schema() {
        let mut openapi: OpenApi = serde_json::from_value(json!({
            "openapi": "3.1.0",
            "info": { "title": "People", "version": "1.0.0" },
            "paths": {},
            "components": {
                "schemas": {
                    "PersonPatch": {
                        "type": "object",
                        "required": ["template"],
                        "properties": {
                            "template": { "type": "string" }
                        }
                    }
                }
            }
        }))
        .unwrap();

        let mut registry = SchemaRegistry::new();
        registry.register_field_schema("PersonPatch", "template", uuid_schema());
        registry.apply(&mut openapi);

        let doc = serde_json::to_value(&openapi).unwrap();
        let schema = &doc["components"]["schemas"]["PersonPatch"];
        let required = &schema["required"];
        assert!(
            required.is_null() || required == &json!([]),
            "no required property should survive: {required}"
        );
        assert_eq!(
            schema["properties"]["template"],
            json!({ "type": "string", "format": "uuid" })
        );
    }

    #[test]
    fn test_unmatched_registration_leaves_the_document_unchanged() {
        let mut openapi = people_document();
        let before = serde_json::to_value(&openapi).unwrap();

        let mut registry = SchemaRegistry::new();
        registry.register_parameter::<String>("renamed_long_ago");
        registry.register_field::<String>("NoSuchSchema", "name");
        registry.apply(&mut openapi);

        assert_eq!(serde_json::to_value(&openapi).unwrap(), before);
    }

    #[test]
    fn test_wrapper_schema_is_the_inner_schema() {
        let wrapper =
            serde_json::to_value(<Omittable<Option<String>> as PartialSchema>::schema()).unwrap();
        let inner = serde_json::to_value(<Option<String> as PartialSchema>::schema()).unwrap();
        assert_eq!(wrapper, inner);
    }

    #[derive(utoipa::ToSchema)]
    #[allow(dead_code)]
    struct Person {
        name: String,
    }

    #[test]
    fn test_wrapper_collects_the_inner_schema_under_its_name() {
        assert_eq!(<Omittable<Person> as ToSchema>::name(), "Person");

        let mut collected = Vec::new();
        <Omittable<Person> as ToSchema>::schemas(&mut collected);
        let (_, schema) = collected
            .iter()
            .find(|(name, _)| name == "Person")
            .expect("the inner type's entry should be collected");
        assert_eq!(
            serde_json::to_value(schema).unwrap(),
            serde_json::to_value(<Person as PartialSchema>::schema()).unwrap()
        );
    }
}
