//! Federated GraphQL surface of the customer profile subgraph.
//!
//! - `POST /graphql`            execute a query (also serves `_service` / `_entities`)
//! - `GET  /graphql`, `/graphiql` GraphiQL, when enabled
//!
//! `Customer` is a federation entity keyed by `customerId`; the gateway's
//! `_entities` calls land in [`Query::find_customer_by_id`].

use async_graphql::http::GraphiQLSource;
use async_graphql::{
    Context, EmptyMutation, EmptySubscription, Enum, ErrorExtensions, Object, Schema,
    SimpleObject, ID,
};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    response::{Html, IntoResponse},
    routing::{get, post},
    Router,
};
use customer360_core::{
    Address, Customer, CustomerEntityResolver, CustomerQueryResolver, CustomerReference, DomainError,
    InterfaceError,
};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

pub type CustomerSchema = Schema<Query, EmptyMutation, EmptySubscription>;

/// Per-request data attached before execution.
#[derive(Clone, Debug)]
pub struct RequestContext {
    pub correlation_id: String,
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(name = "CustomerSegment", remote = "customer360_core::CustomerSegment")]
pub enum SegmentValue {
    Platinum,
    Gold,
    Silver,
    Bronze,
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(name = "CustomerStatus", remote = "customer360_core::CustomerStatus")]
pub enum StatusValue {
    Active,
    Inactive,
    Suspended,
    Vip,
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "Address")]
pub struct AddressObject {
    street: Option<String>,
    city: Option<String>,
    state: Option<String>,
    zip_code: Option<String>,
    country: Option<String>,
}

impl From<Address> for AddressObject {
    fn from(address: Address) -> Self {
        Self {
            street: address.street,
            city: address.city,
            state: address.state,
            zip_code: address.zip_code,
            country: address.country,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "Customer")]
pub struct CustomerObject {
    customer_id: ID,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    date_of_birth: Option<String>,
    address: Option<AddressObject>,
    segment: SegmentValue,
    status: StatusValue,
    lifetime_value: Option<f64>,
    risk_score: Option<i32>,
    created_at: Option<String>,
    last_updated: Option<String>,
}

impl From<Customer> for CustomerObject {
    fn from(customer: Customer) -> Self {
        Self {
            customer_id: ID(customer.customer_id.into_inner()),
            first_name: customer.first_name,
            last_name: customer.last_name,
            email: customer.email,
            phone: customer.phone,
            date_of_birth: customer.date_of_birth,
            address: customer.address.map(AddressObject::from),
            segment: customer.segment.into(),
            status: customer.status.into(),
            lifetime_value: customer.lifetime_value,
            risk_score: customer.risk_score,
            created_at: customer.created_at,
            last_updated: customer.last_updated,
        }
    }
}

pub struct Query {
    queries: CustomerQueryResolver,
    entities: CustomerEntityResolver,
}

#[Object]
impl Query {
    /// Fetches a single customer by id.
    async fn customer(
        &self,
        ctx: &Context<'_>,
        customer_id: ID,
    ) -> async_graphql::Result<Option<CustomerObject>> {
        self.queries
            .customer(&customer_id)
            .await
            .map(|customer| Some(CustomerObject::from(customer)))
            .map_err(|error| to_graphql_error(ctx, error))
    }

    /// Searches customers by name or email.
    async fn search_customers(&self, query: String) -> Vec<CustomerObject> {
        self.queries.search_customers(&query).await.into_iter().map(CustomerObject::from).collect()
    }

    #[graphql(entity)]
    async fn find_customer_by_id(
        &self,
        ctx: &Context<'_>,
        #[graphql(key)] customer_id: ID,
    ) -> async_graphql::Result<CustomerObject> {
        self.entities
            .resolve_reference(CustomerReference { customer_id: customer_id.0 })
            .await
            .map(CustomerObject::from)
            .map_err(|error| to_graphql_error(ctx, error))
    }
}

pub fn build_schema(
    queries: CustomerQueryResolver,
    entities: CustomerEntityResolver,
) -> CustomerSchema {
    Schema::build(Query { queries, entities }, EmptyMutation, EmptySubscription)
        .enable_federation()
        .finish()
}

fn to_graphql_error(ctx: &Context<'_>, error: DomainError) -> async_graphql::Error {
    let correlation_id = ctx
        .data_opt::<RequestContext>()
        .map(|request| request.correlation_id.clone())
        .unwrap_or_else(|| "unassigned".to_string());
    let interface = error.into_interface(correlation_id);

    async_graphql::Error::new(interface.to_string()).extend_with(|_, extensions| {
        extensions.set("code", interface.code().to_string());
        extensions.set("correlationId", interface.correlation_id().to_string());
        let InterfaceError::NotFound { customer_id, .. } = &interface;
        extensions.set("customerId", customer_id.clone());
    })
}

#[derive(Clone)]
struct GraphqlState {
    schema: CustomerSchema,
}

pub fn router(schema: CustomerSchema, graphiql: bool) -> Router {
    let state = GraphqlState { schema };
    let router = if graphiql {
        Router::new()
            .route("/graphql", get(graphiql_page).post(graphql_handler))
            .route("/graphiql", get(graphiql_page))
    } else {
        Router::new().route("/graphql", post(graphql_handler))
    };
    router.with_state(state)
}

async fn graphql_handler(
    State(state): State<GraphqlState>,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let correlation_id = Uuid::new_v4().to_string();
    let request =
        request.into_inner().data(RequestContext { correlation_id: correlation_id.clone() });
    let span = info_span!("graphql.request", correlation_id = %correlation_id);

    let response = state.schema.execute(request).instrument(span).await;
    if response.is_err() {
        warn!(
            event_name = "graphql.request.errors",
            correlation_id = %correlation_id,
            error_count = response.errors.len(),
            "graphql request completed with errors"
        );
    } else {
        info!(
            event_name = "graphql.request.completed",
            correlation_id = %correlation_id,
            "graphql request completed"
        );
    }

    response.into()
}

async fn graphiql_page() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_graphql::{Request, SDLExportOptions, Variables};
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request as HttpRequest, StatusCode},
    };
    use customer360_core::config::CrmConfig;
    use customer360_core::{CustomerEntityResolver, CustomerQueryResolver, CustomerService};
    use reqwest::Client;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::{build_schema, router, CustomerSchema, RequestContext};
    use crate::crm::HttpCrmClient;

    const CUSTOMER_FIELDS: &str = "customerId firstName lastName email segment status \
         lifetimeValue riskScore address { street city state zipCode country }";

    async fn crm_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/customers/CUST001"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "customerId": "CUST001",
                "firstName": "Jane",
                "lastName": "Doe",
                "email": "jane.doe@example.com",
                "segment": "gold",
                "status": "bad_value",
                "lifetimeValue": 500.0,
                "riskScore": 10
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/customers/CUST002"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "customerId": "CUST002",
                "firstName": "John",
                "segment": "PLATINUM",
                "status": "vip",
                "address": { "street": "42 Harbor Rd", "city": "Boston", "zipCode": "02110" }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/customers/CUST999"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": "Customer not found",
                "customerId": "CUST999"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/customers/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        server
    }

    fn schema_for(server: &MockServer) -> CustomerSchema {
        let crm = HttpCrmClient::new(Client::new(), &CrmConfig { base_url: server.uri() });
        let service = CustomerService::new(Arc::new(crm));
        build_schema(
            CustomerQueryResolver::new(service.clone()),
            CustomerEntityResolver::new(service),
        )
    }

    async fn execute(schema: &CustomerSchema, query: String, variables: Value) -> Value {
        let request = Request::new(query)
            .variables(Variables::from_json(variables))
            .data(RequestContext { correlation_id: "test-correlation".to_string() });
        let response = schema.execute(request).await;
        serde_json::to_value(&response).expect("response should serialize")
    }

    #[tokio::test]
    async fn customer_query_maps_crm_record() {
        let server = crm_server().await;
        let schema = schema_for(&server);

        let body = execute(
            &schema,
            format!("query($id: ID!) {{ customer(customerId: $id) {{ {CUSTOMER_FIELDS} }} }}"),
            json!({ "id": "CUST001" }),
        )
        .await;

        assert!(body.get("errors").is_none(), "unexpected errors: {body}");
        let customer = &body["data"]["customer"];
        assert_eq!(customer["customerId"], "CUST001");
        assert_eq!(customer["firstName"], "Jane");
        assert_eq!(customer["segment"], "GOLD");
        assert_eq!(customer["status"], "ACTIVE");
        assert_eq!(customer["lifetimeValue"], 500.0);
        assert_eq!(customer["riskScore"], 10);
        assert!(customer["address"].is_null());
    }

    #[tokio::test]
    async fn missing_customer_yields_single_error_naming_the_id() {
        let server = crm_server().await;
        let schema = schema_for(&server);

        let body = execute(
            &schema,
            "{ customer(customerId: \"CUST999\") { customerId firstName } }".to_string(),
            json!({}),
        )
        .await;

        assert!(body["data"]["customer"].is_null());
        let errors = body["errors"].as_array().expect("errors should be present");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0]["message"], "Customer not found: CUST999");
        assert_eq!(errors[0]["extensions"]["code"], "NOT_FOUND");
        assert_eq!(errors[0]["extensions"]["customerId"], "CUST999");
        assert_eq!(errors[0]["extensions"]["correlationId"], "test-correlation");
    }

    #[tokio::test]
    async fn search_with_no_hits_returns_empty_list() {
        let server = crm_server().await;
        let schema = schema_for(&server);

        let body = execute(
            &schema,
            "{ searchCustomers(query: \"doesnotexist\") { customerId } }".to_string(),
            json!({}),
        )
        .await;

        assert!(body.get("errors").is_none(), "unexpected errors: {body}");
        assert_eq!(body["data"]["searchCustomers"], json!([]));
    }

    #[tokio::test]
    async fn entity_resolution_matches_direct_query() {
        let server = crm_server().await;
        let schema = schema_for(&server);

        let direct = execute(
            &schema,
            format!("{{ customer(customerId: \"CUST002\") {{ {CUSTOMER_FIELDS} }} }}"),
            json!({}),
        )
        .await;
        let entities = execute(
            &schema,
            format!(
                "query($representations: [_Any!]!) {{ _entities(representations: $representations) \
                 {{ ... on Customer {{ {CUSTOMER_FIELDS} }} }} }}"
            ),
            json!({
                "representations": [
                    { "__typename": "Customer", "customerId": "CUST002", "orderCount": 3 }
                ]
            }),
        )
        .await;

        assert!(entities.get("errors").is_none(), "unexpected errors: {entities}");
        assert_eq!(entities["data"]["_entities"][0], direct["data"]["customer"]);
        assert_eq!(entities["data"]["_entities"][0]["address"]["city"], "Boston");
    }

    #[tokio::test]
    async fn entity_resolution_reports_missing_customer() {
        let server = crm_server().await;
        let schema = schema_for(&server);

        let body = execute(
            &schema,
            "query($representations: [_Any!]!) { _entities(representations: $representations) \
             { ... on Customer { customerId } } }"
                .to_string(),
            json!({ "representations": [{ "__typename": "Customer", "customerId": "CUST999" }] }),
        )
        .await;

        let errors = body["errors"].as_array().expect("errors should be present");
        assert!(errors.iter().any(|error| error["message"] == "Customer not found: CUST999"));
    }

    #[tokio::test]
    async fn entity_batch_keeps_representation_order() {
        let server = crm_server().await;
        let schema = schema_for(&server);

        let body = execute(
            &schema,
            "query($representations: [_Any!]!) { _entities(representations: $representations) \
             { ... on Customer { customerId firstName } } }"
                .to_string(),
            json!({
                "representations": [
                    { "__typename": "Customer", "customerId": "CUST002" },
                    { "__typename": "Customer", "customerId": "CUST001", "segment": "SILVER" }
                ]
            }),
        )
        .await;

        assert!(body.get("errors").is_none(), "unexpected errors: {body}");
        assert_eq!(
            body["data"]["_entities"],
            json!([
                { "customerId": "CUST002", "firstName": "John" },
                { "customerId": "CUST001", "firstName": "Jane" }
            ])
        );
    }

    #[tokio::test]
    async fn federation_sdl_declares_customer_key() {
        let server = crm_server().await;
        let sdl = schema_for(&server).sdl_with_options(SDLExportOptions::new().federation());

        assert!(sdl.contains("@key(fields: \"customerId\")"), "sdl: {sdl}");
        assert!(sdl.contains("searchCustomers(query: String!): [Customer!]!"), "sdl: {sdl}");
        assert!(sdl.contains("customer(customerId: ID!): Customer"), "sdl: {sdl}");
    }

    #[tokio::test]
    async fn router_executes_posted_queries() {
        let server = crm_server().await;
        let app = router(schema_for(&server), true);

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .method(Method::POST)
                    .uri("/graphql")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({ "query": "{ customer(customerId: \"CUST001\") { firstName } }" })
                            .to_string(),
                    ))
                    .expect("request should build"),
            )
            .await
            .expect("router should respond");

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let body: Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(body["data"]["customer"]["firstName"], "Jane");
    }

    #[tokio::test]
    async fn graphiql_can_be_disabled() {
        let server = crm_server().await;

        let enabled = router(schema_for(&server), true)
            .oneshot(HttpRequest::builder().uri("/graphiql").body(Body::empty()).expect("request"))
            .await
            .expect("router should respond");
        assert_eq!(enabled.status(), StatusCode::OK);

        let disabled = router(schema_for(&server), false)
            .oneshot(HttpRequest::builder().uri("/graphiql").body(Body::empty()).expect("request"))
            .await
            .expect("router should respond");
        assert_eq!(disabled.status(), StatusCode::NOT_FOUND);
    }
}
