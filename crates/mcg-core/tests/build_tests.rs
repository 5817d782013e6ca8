use mcg_core::fetch::{FetchedDocument, MemoryFetcher};
use mcg_core::ir::{ApiModel, HttpMethod, ParameterLocation};
use mcg_core::{Decoration, DecorationHooks, DocumentLoader, normalize, transform};
use serde_json::json;

const PETS_LISTING: &str = include_str!("fixtures/pets-listing.json");
const PETS_DECLARATION: &str = include_str!("fixtures/pets-declaration.json");
const STORE: &str = include_str!("fixtures/store-2.0.yaml");
const CUSTOMERS: &str = include_str!("fixtures/customers.json");
const GEO: &str = include_str!("fixtures/geo.json");

const LISTING_URL: &str = "http://petstore.test/api-docs";
const STORE_URL: &str = "http://store.test/swagger.yaml";

fn pets_fetcher() -> MemoryFetcher {
    MemoryFetcher::new()
        .with(LISTING_URL, FetchedDocument::json(PETS_LISTING))
        .with(
            "http://petstore.test/api-docs/pets",
            FetchedDocument::json(PETS_DECLARATION),
        )
}

fn store_fetcher() -> MemoryFetcher {
    MemoryFetcher::new()
        .with(STORE_URL, FetchedDocument::yaml(STORE))
        .with(
            "http://shared.test/customers.json",
            FetchedDocument::json(CUSTOMERS),
        )
        .with("http://shared.test/geo.json", FetchedDocument::json(GEO))
}

async fn store_model() -> ApiModel {
    let fetcher = store_fetcher();
    normalize(&fetcher, STORE_URL, &DecorationHooks::new())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_legacy_pets_listing_end_to_end() {
    let fetcher = pets_fetcher();
    let model = normalize(&fetcher, LISTING_URL, &DecorationHooks::new())
        .await
        .unwrap();

    assert_eq!(model.info.title, "Pet Store");
    assert_eq!(model.info.version, "1.0.0");
    assert_eq!(
        model.info.description.as_deref(),
        Some("A **sample** pet store.")
    );
    assert_eq!(
        model.info.extensions["contact"],
        json!({"name": "api@petstore.test"})
    );
    assert_eq!(
        model.info.extensions["license"],
        json!({
            "name": "Apache 2.0",
            "url": "http://www.apache.org/licenses/LICENSE-2.0.html"
        })
    );
    assert_eq!(model.host.as_deref(), Some("petstore.test:8080"));
    assert_eq!(model.base_path.as_deref(), Some("/api"));

    assert_eq!(model.resources.len(), 1);
    let pets = &model.resources["Pets"];
    assert_eq!(pets.description, "Operations about pets");

    let groups: Vec<_> = pets.groups.keys().map(String::as_str).collect();
    assert_eq!(groups, ["Pets Collection"]);

    assert_eq!(pets.operations.len(), 1);
    let op = &pets.operations[0];
    assert_eq!(op.method, HttpMethod::Get);
    assert_eq!(op.operation_id.as_deref(), Some("listPets"));
    assert_eq!(op.produces, ["application/json"]);
    assert_eq!(
        op.description.as_deref(),
        Some("Returns *every* pet in the store")
    );
    assert_eq!(op.security, Some(json!(["pets:read"])));
    assert_eq!(
        op.responses["200"].schema,
        Some(json!({"type": "array", "items": {"$ref": "#/definitions/Pet"}}))
    );

    assert_eq!(model.models.len(), 1);
    let pet = &model.models["Pet"];
    assert_eq!(pet.properties.len(), 2);
    assert!(pet.properties["id"].required);
    assert!(!pet.properties["name"].required);
    assert_eq!(pet.properties["id"].format.as_deref(), Some("int64"));
}

#[tokio::test]
async fn test_legacy_declaration_failure_fails_the_load() {
    let fetcher = MemoryFetcher::new().with(LISTING_URL, FetchedDocument::json(PETS_LISTING));

    let err = normalize(&fetcher, LISTING_URL, &DecorationHooks::new())
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("http://petstore.test/api-docs/pets"), "{message}");
    assert!(message.contains("error 404"), "{message}");
}

#[tokio::test]
async fn test_store_groups_by_path_shape() {
    let model = store_model().await;

    let orders = &model.resources["Orders"];
    assert_eq!(orders.description, "Order management");

    let groups: Vec<_> = orders.groups.keys().map(String::as_str).collect();
    assert_eq!(groups, ["Orders Collection", "Orders", "Orders Actions"]);

    let collection: Vec<_> = orders
        .group_operations(&orders.groups["Orders Collection"])
        .filter_map(|op| op.operation_id.as_deref())
        .collect();
    assert_eq!(collection, ["listOrders", "createOrder"]);

    let actions: Vec<_> = orders
        .group_operations(&orders.groups["Orders Actions"])
        .filter_map(|op| op.operation_id.as_deref())
        .collect();
    assert_eq!(actions, ["cancelOrder"]);
}

#[tokio::test]
async fn test_store_derived_operation_fields() {
    let model = store_model().await;
    let orders = &model.resources["Orders"];

    let create = &orders.operations[1];
    let body = create.body_param.as_ref().unwrap();
    assert_eq!(body.location, ParameterLocation::Body);
    assert!(body.required);
    assert_eq!(create.produces, ["application/json"]);
    assert!(create.success_response().is_some());

    let get = &orders.operations[2];
    assert_eq!(get.path_params.len(), 1);
    assert_eq!(get.required_params.len(), 1);
    assert!(!get.is_query_builder);

    assert_eq!(model.query_builders.len(), 1);
    assert_eq!(model.query_builders[0].operation_id.as_deref(), Some("listOrders"));
    assert_eq!(
        model.query_builders[0].query_builder_name.as_deref(),
        Some("OrdersQuery")
    );
}

#[tokio::test]
async fn test_store_discovers_models_across_documents() {
    let model = store_model().await;

    let names: Vec<_> = model.models.keys().map(String::as_str).collect();
    assert_eq!(names, ["Address", "Country", "Customer", "Line", "Order"]);

    // Order -> Line -> Order is registered once
    let line = &model.models["Line"];
    assert_eq!(
        line.properties["order"].reference.as_deref(),
        Some("#/definitions/Order")
    );
    assert!(model.models["Order"].properties["id"].required);
}

#[tokio::test]
async fn test_build_is_deterministic() {
    let fetcher = store_fetcher();
    let documents = DocumentLoader::new(&fetcher).load(STORE_URL).await.unwrap();

    let first = transform::build(&documents, &DecorationHooks::new()).unwrap();
    let second = transform::build(&documents, &DecorationHooks::new()).unwrap();

    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
}

#[tokio::test]
async fn test_hooks_see_ancestors_and_contribute_imports() {
    let hooks = DecorationHooks::new()
        .on_response(|response, operation, _, status| {
            let schema = response.schema.as_ref()?;
            let reference = schema.get("$ref")?.as_str()?;
            Some(
                Decoration::new()
                    .field("returnLabel", format!("{} {status}", operation.label()))
                    .import(format!("model.{}", reference.rsplit('/').next()?)),
            )
        })
        .on_property(|property, model| {
            model
                .is_required(&property.name)
                .then(|| Decoration::new().field("annotation", "@NotNull").import("javax.validation.constraints.NotNull"))
        });

    let fetcher = store_fetcher();
    let model = normalize(&fetcher, STORE_URL, &hooks).await.unwrap();

    let orders = &model.resources["Orders"];
    assert_eq!(orders.imports, ["model.Order"]);
    assert_eq!(
        orders.operations[1].responses["201"].extensions["returnLabel"],
        json!("createOrder 201")
    );

    let order = &model.models["Order"];
    assert_eq!(order.properties["id"].extensions["annotation"], json!("@NotNull"));
    assert!(!order.properties["lines"].extensions.contains_key("annotation"));
    assert_eq!(order.imports, ["javax.validation.constraints.NotNull"]);
    assert!(model.models["Line"].imports.is_empty());
}
