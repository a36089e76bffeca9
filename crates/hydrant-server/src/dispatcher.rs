//! Request dispatch.
//!
//! The [`Dispatcher`] turns one [`RequestInfo`] into one [`ResponseInfo`]:
//!
//! 1. CORS preflights are answered from the verbs registered for the path.
//! 2. The descriptor table selects the operation (`404` / `405` otherwise).
//! 3. Arguments are bound from the URL, query string, headers and body.
//! 4. The handler runs and registered [`ResponseTransformer`]s rewrite its
//!    outcome.
//! 5. The result and `out` values are mapped to the body and headers, and
//!    the status is chosen from the operation kind.
//!
//! Every fault becomes a plain-text response; dispatch itself never fails.

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http::header::{CONTENT_RANGE, CONTENT_TYPE, LOCATION};
use http::{HeaderName, HeaderValue, StatusCode};
use http_body_util::Full;
use hydrant_convert::multipart::read_parts;
use hydrant_convert::{format_scalar, ConverterRegistry, Written};
use hydrant_core::{
    ArgumentSource, HydrantError, HydrantResult, ParameterRole, RequestInfo, ResponseInfo,
    ResultTarget, TypeShape,
};
use hydrant_extract::{bind, Arguments, BindingContext};
use hydrant_router::{Params, Resolution};
use hydrant_telemetry::{metrics, InFlightGuard};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::catalog::DescriptorTable;
use crate::controller::Invocation;
use crate::cors::CorsPolicy;
use crate::descriptor::{OperationDescriptor, OperationKind};
use crate::outcome::Outcome;
use crate::transform::ResponseTransformer;

/// Operation label used for requests that matched nothing.
const UNMATCHED: &str = "unmatched";

/// Dispatches requests to the operations of a [`DescriptorTable`].
///
/// # Example
///
/// ```rust
/// use hydrant_convert::ConverterRegistry;
/// use hydrant_core::{MethodInfo, RequestInfo};
/// use hydrant_server::{ControllerCatalog, ControllerDefinition, Dispatcher, Outcome};
/// use http::{Method, StatusCode, Uri};
///
/// # tokio_test::block_on(async {
/// let table = ControllerCatalog::new()
///     .with(ControllerDefinition::new("Ping", "/api/ping").method(
///         MethodInfo::new("get").returns::<String>(),
///         |_| async { Outcome::of("pong") },
///     ))
///     .build()
///     .unwrap();
///
/// let dispatcher = Dispatcher::new(table, ConverterRegistry::with_defaults());
/// let response = dispatcher
///     .dispatch(RequestInfo::new(Method::GET, Uri::from_static("/api/ping")))
///     .await;
///
/// assert_eq!(response.status(), StatusCode::OK);
/// assert_eq!(response.body_str(), Some("\"pong\""));
/// # });
/// ```
#[derive(Clone)]
pub struct Dispatcher {
    table: Arc<DescriptorTable>,
    converters: Arc<ConverterRegistry>,
    cors: CorsPolicy,
    transformers: Vec<Arc<dyn ResponseTransformer>>,
}

impl Dispatcher {
    /// Creates a dispatcher with the default CORS policy.
    #[must_use]
    pub fn new(table: DescriptorTable, converters: ConverterRegistry) -> Self {
        Self::from_shared(Arc::new(table), Arc::new(converters))
    }

    /// Creates a dispatcher over shared state.
    #[must_use]
    pub fn from_shared(table: Arc<DescriptorTable>, converters: Arc<ConverterRegistry>) -> Self {
        Self {
            table,
            converters,
            cors: CorsPolicy::default(),
            transformers: Vec::new(),
        }
    }

    /// Replaces the CORS policy.
    #[must_use]
    pub fn with_cors(mut self, cors: CorsPolicy) -> Self {
        self.cors = cors;
        self
    }

    /// Appends a response transformer.
    #[must_use]
    pub fn with_transformer<T: ResponseTransformer + 'static>(mut self, transformer: T) -> Self {
        self.transformers.push(Arc::new(transformer));
        self
    }

    /// The descriptor table.
    #[must_use]
    pub fn table(&self) -> &Arc<DescriptorTable> {
        &self.table
    }

    /// The converter registry.
    #[must_use]
    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    /// The CORS policy.
    #[must_use]
    pub const fn cors(&self) -> &CorsPolicy {
        &self.cors
    }

    /// Handles one request. Faults are rendered as plain-text responses.
    pub async fn dispatch(&self, request: RequestInfo) -> ResponseInfo {
        let _in_flight = InFlightGuard::new();
        let started = Instant::now();
        let request = Arc::new(request);

        let (operation, result) = self.run(&request).await;
        let mut response = match result {
            Ok(response) => response,
            Err(error) => self.fault(&request, operation.as_deref(), &error),
        };

        if !request.is_cors_preflight() {
            if let Some(origin) = request.origin() {
                response
                    .headers_mut()
                    .extend(self.cors.response_headers(origin));
            }
        }

        let elapsed = started.elapsed();
        let operation = operation.as_deref().unwrap_or(UNMATCHED);
        info!(
            request_id = %request.request_id(),
            operation,
            http.method = %request.method(),
            http.path = request.path(),
            http.status_code = response.status().as_u16(),
            duration_ms = elapsed.as_millis() as u64,
            "request completed"
        );
        metrics::record_request(
            operation,
            request.method().as_str(),
            response.status().as_u16(),
            elapsed,
        );
        response
    }

    /// Handles one request, returning faults as errors instead of rendering
    /// them. CORS response headers are not added.
    ///
    /// # Errors
    ///
    /// Returns the fault that ended dispatch.
    pub async fn try_dispatch(&self, request: RequestInfo) -> HydrantResult<ResponseInfo> {
        let request = Arc::new(request);
        self.run(&request).await.1
    }

    /// Buffers an `http::Request`, dispatches it and converts the response.
    pub async fn handle_http<B>(&self, request: http::Request<B>) -> http::Response<Full<Bytes>>
    where
        B: http_body::Body,
        B::Error: std::fmt::Display,
    {
        let response = match RequestInfo::from_http(request).await {
            Ok(request) => self.dispatch(request).await,
            Err(error) => ResponseInfo::from_error(&error),
        };
        response.into_http()
    }

    async fn run(&self, request: &Arc<RequestInfo>) -> (Option<String>, HydrantResult<ResponseInfo>) {
        if request.is_cors_preflight() {
            return (None, self.preflight(request));
        }

        let (descriptor, params) = match self.table.resolve(request.method(), request.path()) {
            Resolution::Matched(matched) => (Arc::clone(matched.value), matched.params),
            Resolution::MethodNotAllowed(allowed) => {
                return (
                    None,
                    Err(HydrantError::method_not_allowed(request.method(), allowed)),
                )
            }
            Resolution::NotFound => {
                return (
                    None,
                    Err(HydrantError::not_found(format!(
                        "no operation matches {}",
                        request.path()
                    ))),
                )
            }
        };

        let operation = format!("{}.{}", descriptor.controller(), descriptor.method());
        let result = self.invoke(&descriptor, request, params).await;
        (Some(operation), result)
    }

    fn preflight(&self, request: &RequestInfo) -> HydrantResult<ResponseInfo> {
        let allowed = self.table.allowed_methods(request.path());
        if allowed.is_empty() {
            return Err(HydrantError::not_found(format!(
                "no operation matches {}",
                request.path()
            )));
        }
        let mut response = ResponseInfo::new(StatusCode::NO_CONTENT);
        let origin = request.origin().unwrap_or_default();
        response
            .headers_mut()
            .extend(self.cors.preflight_headers(origin, &allowed));
        debug!(origin, path = request.path(), "answered preflight");
        Ok(response)
    }

    async fn invoke(
        &self,
        descriptor: &Arc<OperationDescriptor>,
        request: &Arc<RequestInfo>,
        params: Params,
    ) -> HydrantResult<ResponseInfo> {
        debug!(
            controller = descriptor.controller(),
            method = descriptor.method(),
            template = %descriptor.template(),
            "matched operation"
        );

        let reads_body = descriptor
            .arguments()
            .iter()
            .any(|argument| argument.source() == ArgumentSource::Body);
        let parts = if reads_body { read_parts(request).await? } else { None };
        let context = BindingContext::new(request, params)?.with_parts(parts);
        let arguments = bind(descriptor.arguments(), &context, &self.converters)?;

        // Fail before running the handler when nothing can write the result.
        let result = descriptor.result();
        if result.writes_body() {
            self.converters.select_outbound(result.shape(), request)?;
        }

        let invocation = Invocation::new(
            arguments.clone(),
            Arc::clone(request),
            Arc::clone(&self.table),
        );
        let mut outcome = (descriptor.handler())(invocation).await?;
        let item_count = outcome.value().as_array().map(Vec::len);

        for transformer in &self.transformers {
            outcome = transformer.transform(descriptor, request, &arguments, outcome)?;
        }

        self.respond(descriptor, request, &arguments, outcome, item_count)
    }

    fn respond(
        &self,
        descriptor: &OperationDescriptor,
        request: &RequestInfo,
        arguments: &Arguments,
        outcome: Outcome,
        item_count: Option<usize>,
    ) -> HydrantResult<ResponseInfo> {
        let binding = descriptor.result();
        let mut response = ResponseInfo::new(StatusCode::OK);
        let mut wrote_body = false;

        match binding.target() {
            ResultTarget::Body => {
                let shape = outcome
                    .shape()
                    .cloned()
                    .unwrap_or_else(|| binding.shape().clone());
                if shape != TypeShape::Unit && !outcome.value().is_null() {
                    let written = self.write_body(&shape, &outcome, request)?;
                    response = response
                        .with_header(CONTENT_TYPE, HeaderValue::from_static(written.content_type))
                        .with_body(written.body);
                    wrote_body = true;
                }
            }
            ResultTarget::Header(name) => {
                if let Some(value) = header_value(name, outcome.value(), request)? {
                    response.headers_mut().insert(name.clone(), value);
                }
            }
        }

        for (output, value) in binding.outputs().iter().zip(outcome.outputs()) {
            let Some(name) = output.target().header() else {
                continue;
            };
            let text = if name == CONTENT_RANGE {
                content_range(descriptor, arguments, item_count.unwrap_or(0), value)
            } else {
                format_scalar(value)
            };
            response.headers_mut().insert(name.clone(), to_header(name, &text)?);
        }

        response.headers_mut().extend(outcome.headers().clone());

        let status = if descriptor.kind() == OperationKind::Create {
            StatusCode::CREATED
        } else if wrote_body {
            StatusCode::OK
        } else {
            StatusCode::NO_CONTENT
        };
        response.set_status(status);

        metrics::record_response_size(
            &format!("{}.{}", descriptor.controller(), descriptor.method()),
            response.body().len() as u64,
        );
        Ok(response)
    }

    fn write_body(
        &self,
        shape: &TypeShape,
        outcome: &Outcome,
        request: &RequestInfo,
    ) -> HydrantResult<Written> {
        let written = match outcome.media_type() {
            Some(media_type) => {
                let converter = self
                    .converters
                    .select_for_media(shape, media_type)
                    .ok_or_else(|| {
                        HydrantError::not_acceptable(format!(
                            "no converter writes {shape} as {media_type}"
                        ))
                    })?;
                ConverterRegistry::write_with(converter, shape, outcome.value())?
            }
            None => self.converters.write(shape, outcome.value(), request)?,
        };
        debug!(media_type = written.content_type, "writing response body");
        Ok(written)
    }

    fn fault(
        &self,
        request: &RequestInfo,
        operation: Option<&str>,
        error: &HydrantError,
    ) -> ResponseInfo {
        let operation = operation.unwrap_or(UNMATCHED);
        if error.is_client_error() {
            warn!(
                request_id = %request.request_id(),
                operation,
                error = %error,
                "request rejected"
            );
        } else {
            error!(
                request_id = %request.request_id(),
                operation,
                error = ?error,
                "request failed"
            );
        }
        match error {
            HydrantError::UnsupportedMediaType { .. } => {
                metrics::record_negotiation_failure("inbound");
            }
            HydrantError::NotAcceptable { .. } => metrics::record_negotiation_failure("outbound"),
            _ => {}
        }
        ResponseInfo::from_error(error)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("operations", &self.table.len())
            .field("media_types", &self.converters.media_types())
            .field("cors", &self.cors)
            .field("transformers", &self.transformers.len())
            .finish()
    }
}

/// Renders a header-targeted result; `None` skips the header.
///
/// `Location` values are appended to the request URL.
fn header_value(
    name: &HeaderName,
    value: &Value,
    request: &RequestInfo,
) -> HydrantResult<Option<HeaderValue>> {
    if value.is_null() {
        return Ok(None);
    }
    let text = if name == LOCATION {
        format!(
            "{}/{}",
            request.url_without_query().trim_end_matches('/'),
            format_scalar(value)
        )
    } else {
        format_scalar(value)
    };
    to_header(name, &text).map(Some)
}

fn to_header(name: &HeaderName, text: &str) -> HydrantResult<HeaderValue> {
    HeaderValue::from_str(text).map_err(|e| {
        HydrantError::internal_with_source(format!("invalid value for header {name}"), e)
    })
}

/// `members {first}-{last}/{total}`, or `members */{total}` for an empty page.
fn content_range(
    descriptor: &OperationDescriptor,
    arguments: &Arguments,
    count: usize,
    total: &Value,
) -> String {
    let skip = descriptor
        .argument_with_role(ParameterRole::Skip)
        .and_then(|binding| arguments.value(binding.name()))
        .and_then(Value::as_u64)
        .unwrap_or(0);
    let total = format_scalar(total);
    if count == 0 {
        format!("members */{total}")
    } else {
        let last = skip.saturating_add(count as u64 - 1);
        format!("members {skip}-{last}/{total}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ControllerCatalog;
    use crate::controller::ControllerDefinition;
    use crate::resource::list_method;
    use crate::testing::{product_table, ProductStore};
    use http::header::{ACCEPT, ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_REQUEST_METHOD, ORIGIN};
    use http::{header, Method, Uri};
    use hydrant_core::{Capability, MethodInfo, ParameterInfo};
    use serde_json::json;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(product_table(ProductStore::seeded(3)), ConverterRegistry::with_defaults())
    }

    fn get(uri: &'static str) -> RequestInfo {
        RequestInfo::new(Method::GET, Uri::from_static(uri))
            .with_header(header::HOST, HeaderValue::from_static("shop.test"))
    }

    fn json_request(method: Method, uri: &'static str, body: Value) -> RequestInfo {
        RequestInfo::new(method, Uri::from_static(uri))
            .with_header(header::HOST, HeaderValue::from_static("shop.test"))
            .with_header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .with_body(body.to_string())
    }

    fn body_json(response: &ResponseInfo) -> Value {
        serde_json::from_slice(response.body()).unwrap()
    }

    #[tokio::test]
    async fn test_get_entity() {
        let response = dispatcher().dispatch(get("/api/product/2")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.header_str(CONTENT_TYPE), Some("application/json"));
        assert_eq!(body_json(&response)["name"], "Product 2");
    }

    #[tokio::test]
    async fn test_get_missing_entity_is_not_found() {
        let response = dispatcher().dispatch(get("/api/product/99")).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.body_str().unwrap().contains("Product"));
    }

    #[tokio::test]
    async fn test_list_with_paging() {
        let response = dispatcher()
            .dispatch(get("/api/product?$skip=1&$top=2"))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.header_str(CONTENT_RANGE), Some("members 1-2/3"));
        let items = body_json(&response);
        assert_eq!(items.as_array().unwrap().len(), 2);
        assert_eq!(items[0]["id"], 2);
    }

    #[tokio::test]
    async fn test_list_past_the_end() {
        let response = dispatcher().dispatch(get("/api/product?$skip=10")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.header_str(CONTENT_RANGE), Some("members */3"));
        assert_eq!(body_json(&response), json!([]));
    }

    #[tokio::test]
    async fn test_skip_at_the_numeric_limit() {
        let response = dispatcher()
            .dispatch(get("/api/product?$skip=18446744073709551615&$top=10"))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.header_str(CONTENT_RANGE), Some("members */3"));
    }

    #[tokio::test]
    async fn test_content_range_saturates() {
        let table = ControllerCatalog::new()
            .with(
                ControllerDefinition::new("Feed", "/api/feed")
                    .capability(Capability::List)
                    .method(list_method(TypeShape::String), |_| async {
                        Ok(Outcome::of(&["a", "b"])?.with_output(json!(2)))
                    }),
            )
            .build()
            .unwrap();
        let dispatcher = Dispatcher::new(table, ConverterRegistry::with_defaults());

        let response = dispatcher
            .dispatch(get("/api/feed?$skip=18446744073709551615"))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.header_str(CONTENT_RANGE),
            Some("members 18446744073709551615-18446744073709551615/2")
        );
    }

    #[tokio::test]
    async fn test_create_sets_location() {
        let dispatcher = dispatcher();
        let response = dispatcher
            .dispatch(json_request(
                Method::POST,
                "/api/product",
                json!({"id": 0, "name": "Lamp", "price": 12.5}),
            ))
            .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.header_str(LOCATION),
            Some("http://shop.test/api/product/4")
        );
        assert!(response.body().is_empty());

        let fetched = dispatcher.dispatch(get("/api/product/4")).await;
        assert_eq!(body_json(&fetched)["name"], "Lamp");
    }

    #[tokio::test]
    async fn test_update_and_delete_return_no_content() {
        let dispatcher = dispatcher();
        let updated = dispatcher
            .dispatch(json_request(
                Method::PUT,
                "/api/product/1",
                json!({"id": 1, "name": "Renamed", "price": 1.0}),
            ))
            .await;
        assert_eq!(updated.status(), StatusCode::NO_CONTENT);

        let deleted = dispatcher
            .dispatch(RequestInfo::new(Method::DELETE, Uri::from_static("/api/product/1")))
            .await;
        assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

        let missing = dispatcher.dispatch(get("/api/product/1")).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_path() {
        let response = dispatcher().dispatch(get("/api/unknown")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_wrong_verb_lists_allowed_methods() {
        let response = dispatcher()
            .dispatch(RequestInfo::new(Method::PATCH, Uri::from_static("/api/product/1")))
            .await;

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let allow = response.header_str(header::ALLOW).unwrap();
        assert!(allow.contains("GET"));
        assert!(allow.contains("PUT"));
        assert!(allow.contains("DELETE"));
    }

    #[tokio::test]
    async fn test_malformed_key_is_bad_request() {
        let response = dispatcher().dispatch(get("/api/product/abc")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unsupported_body_media_type() {
        let request = RequestInfo::new(Method::POST, Uri::from_static("/api/product"))
            .with_header(CONTENT_TYPE, HeaderValue::from_static("application/x-unknown"))
            .with_body("???");
        let response = dispatcher().dispatch(request).await;

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_strict_accept_rejects_before_invoking() {
        let dispatcher = Dispatcher::new(
            product_table(ProductStore::seeded(1)),
            ConverterRegistry::with_defaults().strict_accept(true),
        );
        let request = get("/api/product/1").with_header(ACCEPT, HeaderValue::from_static("image/png"));

        let response = dispatcher.dispatch(request).await;
        assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    }

    #[tokio::test]
    async fn test_preflight_is_answered_from_route_verbs() {
        let request = RequestInfo::new(Method::OPTIONS, Uri::from_static("/api/product/1"))
            .with_header(ORIGIN, HeaderValue::from_static("https://app.example"))
            .with_header(ACCESS_CONTROL_REQUEST_METHOD, HeaderValue::from_static("PUT"));

        let response = dispatcher().dispatch(request).await;

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let methods = response
            .header_str(header::ACCESS_CONTROL_ALLOW_METHODS)
            .unwrap();
        assert!(methods.contains("PUT"));
        assert!(methods.contains("OPTIONS"));
        assert!(!methods.contains("POST"));
    }

    #[tokio::test]
    async fn test_preflight_for_unknown_path() {
        let request = RequestInfo::new(Method::OPTIONS, Uri::from_static("/nowhere"))
            .with_header(ORIGIN, HeaderValue::from_static("https://app.example"))
            .with_header(ACCESS_CONTROL_REQUEST_METHOD, HeaderValue::from_static("GET"));

        let response = dispatcher().dispatch(request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cross_origin_response_headers() {
        let request = get("/api/product/1")
            .with_header(ORIGIN, HeaderValue::from_static("https://app.example"));

        let response = dispatcher().dispatch(request).await;
        assert_eq!(response.header_str(ACCESS_CONTROL_ALLOW_ORIGIN), Some("*"));
    }

    #[tokio::test]
    async fn test_disallowed_origin_gets_no_cors_headers() {
        let dispatcher = dispatcher().with_cors(CorsPolicy::new().allow_origin("https://app.example"));
        let request = get("/api/product/1")
            .with_header(ORIGIN, HeaderValue::from_static("https://evil.example"));

        let response = dispatcher.dispatch(request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.header_str(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    #[tokio::test]
    async fn test_server_fault_is_opaque() {
        let table = ControllerCatalog::new()
            .with(ControllerDefinition::new("Broken", "/api/broken").method(
                MethodInfo::new("get").returns::<String>(),
                |_| async {
                    Err(HydrantError::internal_with_source(
                        "lookup failed",
                        std::io::Error::new(std::io::ErrorKind::Other, "disk on fire"),
                    ))
                },
            ))
            .build()
            .unwrap();
        let dispatcher = Dispatcher::new(table, ConverterRegistry::with_defaults());

        let response = dispatcher.dispatch(get("/api/broken")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!response.body_str().unwrap().contains("disk on fire"));
    }

    #[tokio::test]
    async fn test_outcome_media_type_bypasses_accept() {
        let table = ControllerCatalog::new()
            .with(ControllerDefinition::new("Note", "/api/note").method(
                MethodInfo::new("get").returns::<String>(),
                |_| async { Ok(Outcome::of("hello")?.with_media_type("text/plain")) },
            ))
            .build()
            .unwrap();
        let dispatcher = Dispatcher::new(table, ConverterRegistry::with_defaults());
        let request = get("/api/note").with_header(ACCEPT, HeaderValue::from_static("application/json"));

        let response = dispatcher.dispatch(request).await;
        assert_eq!(response.header_str(CONTENT_TYPE), Some("text/plain"));
        assert_eq!(response.body_str(), Some("hello"));
    }

    #[tokio::test]
    async fn test_custom_header_result() {
        let table = ControllerCatalog::new()
            .with(
                ControllerDefinition::new("Token", "/api/token")
                    .capability(Capability::Create)
                    .method(
                        MethodInfo::new("issue")
                            .capability(Capability::Create)
                            .param(ParameterInfo::new::<String>("user"))
                            .returns::<uuid::Uuid>(),
                        |invocation| async move {
                            let _user: String = invocation.get("user")?;
                            Outcome::of(&uuid::Uuid::nil())
                        },
                    ),
            )
            .build()
            .unwrap();
        let dispatcher = Dispatcher::new(table, ConverterRegistry::with_defaults());
        let request = RequestInfo::new(Method::POST, Uri::from_static("/api/token?user=ada"))
            .with_header(header::HOST, HeaderValue::from_static("shop.test"));

        let response = dispatcher.dispatch(request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.header_str(LOCATION),
            Some("http://shop.test/api/token/00000000-0000-0000-0000-000000000000")
        );
    }

    fn calculator() -> Dispatcher {
        let table = ControllerCatalog::new()
            .with(ControllerDefinition::new("Calculator", "/api/calculator").method(
                MethodInfo::new("modulo")
                    .verb(Method::POST)
                    .param(ParameterInfo::new::<i64>("operand1").from_body())
                    .param(ParameterInfo::new::<i64>("operand2").from_body())
                    .returns::<i64>(),
                |invocation| async move {
                    let operand1: i64 = invocation.get("operand1")?;
                    let operand2: i64 = invocation.get("operand2")?;
                    Outcome::of(&(operand1 % operand2))
                },
            ))
            .build()
            .unwrap();
        Dispatcher::new(table, ConverterRegistry::with_defaults())
    }

    #[tokio::test]
    async fn test_body_arguments_from_multipart_parts() {
        let request = RequestInfo::new(Method::POST, Uri::from_static("/api/calculator/modulo"))
            .with_header(
                CONTENT_TYPE,
                HeaderValue::from_static("multipart/mixed; boundary=test"),
            )
            .with_body(
                "--test\r\nContent-Type: text/plain\r\nContent-Length:3\r\n\r\n1\r\n\
                 --test\r\nContent-Type: text/plain\r\nContent-Length:3\r\n\r\n2\r\n--test--",
            );

        let response = calculator().dispatch(request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body_str(), Some("1"));
    }

    #[tokio::test]
    async fn test_several_body_arguments_need_multipart() {
        let request = json_request(Method::POST, "/api/calculator/modulo", json!(1));

        let response = calculator().dispatch(request).await;
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_malformed_multipart_body() {
        let request = RequestInfo::new(Method::POST, Uri::from_static("/api/calculator/modulo"))
            .with_header(CONTENT_TYPE, HeaderValue::from_static("multipart/mixed"))
            .with_body("--test\r\n\r\n1\r\n--test--");

        let response = calculator().dispatch(request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_try_dispatch_returns_fault() {
        let error = dispatcher()
            .try_dispatch(get("/api/unknown"))
            .await
            .unwrap_err();
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_handle_http() {
        let request = http::Request::builder()
            .uri("/api/product/1")
            .body(Full::new(Bytes::new()))
            .unwrap();

        let response = dispatcher().handle_http(request).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
