/// MCP server implementation for the Moodle API catalog.
///
/// Exposes four tools:
/// - `lookup_api`: Resolve one entry by slug, anchor ID or title (partial matches allowed)
/// - `search_apis`: Keyword search with an optional category filter
/// - `list_categories`: Category overview in documentation order
/// - `get_category`: All entries of one category
///
/// and the `moodleapi://` resources (catalog, `api/{slug}`, `category/{categoryId}`) with
/// argument completion for both templates.
use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, Json, RoleServer, ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    schemars::JsonSchema,
    service::RequestContext,
    tool, tool_handler, tool_router,
};
use serde::Serialize;
use tracing::debug;

use crate::index::CatalogIndex;
use crate::model::ApiEntry;
use crate::render;
use crate::resources::{self, ResourceTarget};
use crate::search::{DEFAULT_LIMIT, MAX_LIMIT};
use mcp_common::mcp_api::{
    CategoryDetailResponse, CategoryInfo, CategoryListResponse, GetCategoryParams,
    LookupApiParams, LookupApiResponse, SearchApisParams, SearchApisResponse,
};

const JSON_MIME: &str = "application/json";
const MARKDOWN_MIME: &str = "text/markdown";

#[derive(Clone)]
pub struct MoodleApisServer {
    index: Arc<CatalogIndex>,
    tool_router: ToolRouter<MoodleApisServer>,
}

/// Output schema for tools that return hand-built `CallToolResult`s.
fn output_schema<T: JsonSchema + 'static>() -> Arc<JsonObject> {
    rmcp::handler::server::tool::schema_for_output::<T>().unwrap_or_else(|e| {
        panic!(
            "invalid output schema for {}: {e}",
            std::any::type_name::<T>()
        )
    })
}

/// Structured content plus a readable text rendering.
fn rendered<T: Serialize>(payload: &T, text: String) -> Result<CallToolResult, McpError> {
    let structured = serde_json::to_value(payload).map_err(|e| {
        McpError::internal_error(format!("failed to serialize structured content: {e}"), None)
    })?;
    Ok(CallToolResult {
        content: vec![Content::text(text)],
        structured_content: Some(structured),
        is_error: Some(false),
        meta: None,
    })
}

fn text_contents(uri: String, mime_type: &str, text: String) -> ResourceContents {
    ResourceContents::TextResourceContents {
        uri,
        mime_type: Some(mime_type.to_string()),
        text,
        meta: None,
    }
}

fn json_contents<T: Serialize>(uri: String, payload: &T) -> Result<ResourceContents, McpError> {
    let text = serde_json::to_string_pretty(payload)
        .map_err(|e| McpError::internal_error(format!("failed to serialize {uri}: {e}"), None))?;
    Ok(text_contents(uri, JSON_MIME, text))
}

impl MoodleApisServer {
    pub fn new(index: Arc<CatalogIndex>) -> Self {
        Self {
            index,
            tool_router: Self::tool_router(),
        }
    }

    fn lookup(&self, identifier: &str) -> Result<LookupApiResponse, String> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err("identifier must not be empty".to_string());
        }

        debug!(identifier, "lookup_api");
        let api = self
            .index
            .resolve(identifier)
            .ok_or_else(|| format!("No Moodle API entry matches \"{identifier}\"."))?;

        Ok(LookupApiResponse {
            api: api.to_detail(self.index.source(), self.index.generated_at()),
        })
    }

    fn search(&self, params: SearchApisParams) -> Result<SearchApisResponse, String> {
        let limit = match params.limit {
            None => DEFAULT_LIMIT,
            Some(limit) if (1..=MAX_LIMIT).contains(&(limit as usize)) => limit as usize,
            Some(limit) => {
                return Err(format!("limit must be between 1 and {MAX_LIMIT}, got {limit}"));
            }
        };
        let query = params.query.unwrap_or_default();

        debug!(query, category_id = ?params.category_id, limit, "search_apis");
        let results = self
            .index
            .search(&query, params.category_id.as_deref(), limit)
            .into_iter()
            .map(ApiEntry::to_search_result)
            .collect();

        Ok(SearchApisResponse { results })
    }

    fn catalog(&self) -> CategoryListResponse {
        let categories = self
            .index
            .list_categories()
            .into_iter()
            .map(|summary| CategoryInfo {
                id: summary.id.to_string(),
                title: summary.title.to_string(),
                entry_count: summary.entry_count,
                slugs: self
                    .index
                    .get_category(summary.id)
                    .map(|c| c.entries.iter().map(|api| api.slug.clone()).collect())
                    .unwrap_or_default(),
            })
            .collect();

        CategoryListResponse {
            source: self.index.source().to_string(),
            generated_at: self.index.generated_at().to_string(),
            total_apis: self.index.len(),
            categories,
        }
    }

    fn category(&self, category_id: &str) -> Result<CategoryDetailResponse, String> {
        let category_id = category_id.trim();
        if category_id.is_empty() {
            return Err("categoryId must not be empty".to_string());
        }

        let category = self.index.get_category(category_id).ok_or_else(|| {
            let available: Vec<&str> = self.index.list_categories().iter().map(|c| c.id).collect();
            format!(
                "Category \"{category_id}\" does not exist in the Moodle API catalogue. Available categories: {}",
                available.join(", ")
            )
        })?;

        Ok(CategoryDetailResponse {
            id: category.id.to_string(),
            title: category.title.to_string(),
            entry_count: category.entries.len(),
            apis: category.entries.iter().map(|api| api.to_summary()).collect(),
            source: self.index.source().to_string(),
            generated_at: self.index.generated_at().to_string(),
        })
    }

    /// The catalog resource followed by every concrete entry and category resource.
    fn resource_list(&self) -> Vec<Resource> {
        let catalog = RawResource {
            title: Some("Moodle 4.5 API catalogue".to_string()),
            description: Some(
                "An index of every Moodle 4.5 API entry along with category groupings."
                    .to_string(),
            ),
            mime_type: Some(JSON_MIME.to_string()),
            ..RawResource::new(resources::CATALOG_URI, "moodle-apis-catalog")
        };

        let apis = self.index.entries().iter().map(|api| RawResource {
            title: Some(api.title.clone()),
            description: Some(format!(
                "Moodle 4.5 {} entry for {}.",
                api.category, api.title
            )),
            mime_type: Some(JSON_MIME.to_string()),
            ..RawResource::new(resources::api_uri(&api.slug), format!("api-{}", api.slug))
        });

        let categories = self.index.list_categories().into_iter().map(|c| RawResource {
            title: Some(c.title.to_string()),
            description: Some(format!(
                "Contains {} Moodle 4.5 API entries.",
                c.entry_count
            )),
            mime_type: Some(JSON_MIME.to_string()),
            ..RawResource::new(resources::category_uri(c.id), format!("category-{}", c.id))
        });

        std::iter::once(catalog)
            .chain(apis)
            .chain(categories)
            .map(RawResource::no_annotation)
            .collect()
    }

    fn resource_templates() -> Vec<ResourceTemplate> {
        [
            (
                resources::API_TEMPLATE,
                "moodle-api-entry",
                "Individual Moodle 4.5 API entries",
                "Structured descriptions for each Moodle 4.5 API, including summary text, category and reference links.",
            ),
            (
                resources::CATEGORY_TEMPLATE,
                "moodle-api-category",
                "Moodle 4.5 API categories",
                "API groupings mirroring the Moodle documentation hierarchy.",
            ),
        ]
        .into_iter()
        .map(|(uri_template, name, title, description)| {
            RawResourceTemplate {
                uri_template: uri_template.to_string(),
                name: name.to_string(),
                title: Some(title.to_string()),
                description: Some(description.to_string()),
                mime_type: Some(JSON_MIME.to_string()),
                icons: None,
            }
            .no_annotation()
        })
        .collect()
    }

    fn read(&self, uri: &str) -> Result<ReadResourceResult, McpError> {
        let target = resources::parse_uri(uri).ok_or_else(|| {
            McpError::resource_not_found(format!("unknown resource URI: {uri}"), None)
        })?;
        debug!(uri, "read_resource");

        let contents = match target {
            ResourceTarget::Catalog => {
                vec![json_contents(resources::CATALOG_URI.to_string(), &self.catalog())?]
            }
            ResourceTarget::Api(slug) => {
                let api = self.index.resolve(slug).ok_or_else(|| {
                    McpError::resource_not_found(
                        format!("No Moodle 4.5 API entry matches slug \"{slug}\"."),
                        None,
                    )
                })?;
                let detail = api.to_detail(self.index.source(), self.index.generated_at());
                let base = resources::api_uri(slug);
                vec![
                    json_contents(format!("{base}#json"), &detail)?,
                    text_contents(
                        format!("{base}#markdown"),
                        MARKDOWN_MIME,
                        render::api_markdown(&detail),
                    ),
                ]
            }
            ResourceTarget::Category(category_id) => {
                let detail = self
                    .category(category_id)
                    .map_err(|message| McpError::resource_not_found(message, None))?;
                vec![json_contents(
                    format!("{}#json", resources::category_uri(category_id)),
                    &detail,
                )?]
            }
        };

        Ok(ReadResourceResult { contents })
    }

    /// Completion values for a template argument; anything else completes to nothing.
    fn completion(&self, reference: &Reference, argument: &ArgumentInfo) -> CompletionInfo {
        let values = match (reference.as_resource_uri(), argument.name.as_str()) {
            (Some(resources::API_TEMPLATE), resources::API_ARGUMENT) => resources::complete_prefix(
                self.index.entries().iter().map(|api| api.slug.as_str()),
                &argument.value,
                resources::API_COMPLETION_LIMIT,
            ),
            (Some(resources::CATEGORY_TEMPLATE), resources::CATEGORY_ARGUMENT) => {
                resources::complete_prefix(
                    self.index.list_categories().into_iter().map(|c| c.id),
                    &argument.value,
                    resources::CATEGORY_COMPLETION_LIMIT,
                )
            }
            _ => Vec::new(),
        };

        CompletionInfo {
            total: Some(values.len() as u32),
            has_more: Some(false),
            values,
        }
    }
}

#[tool_router]
impl MoodleApisServer {
    #[tool(
        description = "Retrieve a Moodle 4.5 API entry by slug, anchor ID, or title snippet.",
        output_schema = output_schema::<LookupApiResponse>()
    )]
    async fn lookup_api(
        &self,
        Parameters(params): Parameters<LookupApiParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.lookup(&params.identifier) {
            Ok(response) => {
                let text = render::api_markdown(&response.api);
                rendered(&response, text)
            }
            Err(message) => Ok(CallToolResult::error(vec![Content::text(message)])),
        }
    }

    #[tool(
        description = "Search Moodle 4.5 APIs by keyword with an optional category filter. Every keyword must match; results keep documentation order.",
        output_schema = output_schema::<SearchApisResponse>()
    )]
    async fn search_apis(
        &self,
        Parameters(params): Parameters<SearchApisParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.search(params) {
            Ok(response) => {
                let text = render::search_listing(&response.results);
                rendered(&response, text)
            }
            Err(message) => Ok(CallToolResult::error(vec![Content::text(message)])),
        }
    }

    #[tool(description = "List Moodle 4.5 API categories in documentation order, with entry counts and slugs.")]
    async fn list_categories(&self) -> Result<Json<CategoryListResponse>, String> {
        Ok(Json(self.catalog()))
    }

    #[tool(description = "Get every Moodle 4.5 API entry in a category by category ID (see list_categories).")]
    async fn get_category(
        &self,
        Parameters(params): Parameters<GetCategoryParams>,
    ) -> Result<Json<CategoryDetailResponse>, String> {
        self.category(&params.category_id).map(Json)
    }
}

#[tool_handler]
impl ServerHandler for MoodleApisServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder()
                .enable_completions()
                .enable_resources()
                .enable_tools()
                .build(),
            server_info: Implementation {
                name: "moodle-apis".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("Moodle 4.5 API catalogue".to_string()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Moodle 4.5 API MCP server. Read moodleapi://catalog to discover entries, \
                 moodleapi://api/{slug} or moodleapi://category/{categoryId} for details, and use \
                 lookup_api, search_apis, list_categories or get_category for targeted queries."
                    .to_string(),
            ),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult::with_all_items(self.resource_list()))
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        Ok(ListResourceTemplatesResult::with_all_items(
            Self::resource_templates(),
        ))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        self.read(&request.uri)
    }

    async fn complete(
        &self,
        request: CompleteRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CompleteResult, McpError> {
        Ok(CompleteResult {
            completion: self.completion(&request.r#ref, &request.argument),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rmcp::{
        Json,
        handler::server::wrapper::Parameters,
        model::{ArgumentInfo, CallToolResult, Reference, ResourceContents},
    };

    use super::MoodleApisServer;
    use crate::testing::fixture_index;
    use mcp_common::mcp_api::{
        CategoryDetailResponse, GetCategoryParams, LookupApiParams, LookupApiResponse,
        SearchApisParams, SearchApisResponse,
    };

    fn server() -> MoodleApisServer {
        MoodleApisServer::new(Arc::new(fixture_index()))
    }

    fn text_of(result: &CallToolResult) -> &str {
        &result.content[0].as_text().expect("text content").text
    }

    fn parts(contents: &ResourceContents) -> (&str, Option<&str>, &str) {
        match contents {
            ResourceContents::TextResourceContents {
                uri,
                mime_type,
                text,
                ..
            } => (uri, mime_type.as_deref(), text),
            ResourceContents::BlobResourceContents { .. } => panic!("expected text contents"),
        }
    }

    #[test]
    fn tools_publish_output_schemas() {
        let tools = MoodleApisServer::tool_router().list_all();
        for name in ["lookup_api", "search_apis", "list_categories", "get_category"] {
            let tool = tools
                .iter()
                .find(|t| t.name == name)
                .unwrap_or_else(|| panic!("missing tool: {name}"));
            assert!(
                tool.output_schema.is_some(),
                "tool {name} should publish output_schema"
            );
        }
    }

    #[test]
    fn lookup_returns_entry_with_provenance() {
        let response = server().lookup(" cache ").unwrap();
        assert_eq!(response.api.slug, "cache");
        assert_eq!(response.api.category, "Caching API");
        assert_eq!(response.api.source, "https://moodledev.io/docs/4.5/apis");
        assert_eq!(response.api.generated_at, "2026-10-17T08:30:00.000Z");
    }

    #[test]
    fn lookup_rejects_misses_and_blank_identifiers() {
        let err = server().lookup("gradebook").unwrap_err();
        assert_eq!(err, "No Moodle API entry matches \"gradebook\".");

        let err = server().lookup("   ").unwrap_err();
        assert!(err.contains("must not be empty"));
    }

    #[tokio::test]
    async fn lookup_tool_renders_markdown_next_to_structured_content() {
        let result = server()
            .lookup_api(Parameters(LookupApiParams {
                identifier: "quiz attempt".to_string(),
            }))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(false));
        assert!(text_of(&result).starts_with("# Quiz attempt API\n"));

        let structured: LookupApiResponse =
            serde_json::from_value(result.structured_content.clone().unwrap()).unwrap();
        assert_eq!(structured.api.slug, "quiz-attempt-api");
    }

    #[tokio::test]
    async fn lookup_tool_miss_is_an_error_result() {
        let result = server()
            .lookup_api(Parameters(LookupApiParams {
                identifier: "gradebook".to_string(),
            }))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(result.structured_content.is_none());
        assert!(text_of(&result).contains("\"gradebook\""));
    }

    #[test]
    fn search_maps_results_and_validates_limit() {
        let response = server()
            .search(SearchApisParams {
                query: Some("cache".to_string()),
                category_id: Some("core-apis".to_string()),
                limit: None,
            })
            .unwrap();
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].slug, "cache-2");
        assert_eq!(response.results[0].reference_count, 0);

        for limit in [0, 26] {
            let err = server()
                .search(SearchApisParams {
                    limit: Some(limit),
                    ..Default::default()
                })
                .unwrap_err();
            assert!(err.contains("between 1 and 25"));
        }
    }

    #[test]
    fn search_without_query_lists_everything() {
        let response = server().search(SearchApisParams::default()).unwrap();
        assert_eq!(response.results.len(), 7);
    }

    #[tokio::test]
    async fn search_tool_lists_hits_or_reports_no_matches() {
        let result = server()
            .search_apis(Parameters(SearchApisParams {
                query: Some("quiz".to_string()),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(
            text_of(&result),
            "1. Quiz attempt API (quiz-attempt-api): 1 reference link\n2. Quiz reports (reports): 0 reference links"
        );

        let result = server()
            .search_apis(Parameters(SearchApisParams {
                query: Some("gradebook".to_string()),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(false));
        assert_eq!(text_of(&result), "No Moodle 4.5 APIs matched the requested filters.");
        let structured: SearchApisResponse =
            serde_json::from_value(result.structured_content.clone().unwrap()).unwrap();
        assert!(structured.results.is_empty());

        let result = server()
            .search_apis(Parameters(SearchApisParams {
                limit: Some(0),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
    }

    #[test]
    fn catalog_reports_counts_and_slugs() {
        let response = server().catalog();
        assert_eq!(response.total_apis, 7);
        let ids: Vec<&str> = response.categories.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["caching-api", "core-apis", "plugintypes"]);
        assert_eq!(response.categories[2].slugs, vec!["mod", "plugintypes-access-api"]);
    }

    #[tokio::test]
    async fn get_category_returns_entries_or_error() {
        let Ok(Json(response)) = server()
            .get_category(Parameters(GetCategoryParams {
                category_id: "Plugintypes".to_string(),
            }))
            .await
        else {
            panic!("plugintypes should exist");
        };
        assert_eq!(response.title, "Plugin types");
        assert_eq!(response.entry_count, 2);
        assert_eq!(response.apis[0].references.len(), 2);

        let Err(err) = server()
            .get_category(Parameters(GetCategoryParams {
                category_id: "nope".to_string(),
            }))
            .await
        else {
            panic!("unknown category should fail");
        };
        assert!(err.contains("caching-api, core-apis, plugintypes"));
    }

    #[test]
    fn resource_list_covers_catalog_entries_and_categories() {
        let resources = server().resource_list();
        let uris: Vec<&str> = resources.iter().map(|r| r.uri.as_str()).collect();
        assert_eq!(uris.len(), 1 + 7 + 3);
        assert_eq!(uris[0], "moodleapi://catalog");
        assert_eq!(uris[1], "moodleapi://api/cache");
        assert_eq!(uris[4], "moodleapi://api/cache-2");
        assert_eq!(uris[8], "moodleapi://category/caching-api");
        assert_eq!(resources[1].name, "api-cache");
        assert_eq!(
            resources[9].description.as_deref(),
            Some("Contains 4 Moodle 4.5 API entries.")
        );

        let templates = MoodleApisServer::resource_templates();
        let uri_templates: Vec<&str> = templates.iter().map(|t| t.uri_template.as_str()).collect();
        assert_eq!(
            uri_templates,
            vec!["moodleapi://api/{slug}", "moodleapi://category/{categoryId}"]
        );
    }

    #[test]
    fn read_catalog_resource() {
        let result = server().read("moodleapi://catalog").unwrap();
        assert_eq!(result.contents.len(), 1);
        let (uri, mime, text) = parts(&result.contents[0]);
        assert_eq!(uri, "moodleapi://catalog");
        assert_eq!(mime, Some("application/json"));
        let catalog: serde_json::Value = serde_json::from_str(text).unwrap();
        assert_eq!(catalog["totalApis"], 7);
        assert_eq!(catalog["categories"][0]["slugs"][0], "cache");
    }

    #[test]
    fn read_api_resource_returns_json_and_markdown() {
        let result = server().read("moodleapi://api/mod").unwrap();
        assert_eq!(result.contents.len(), 2);

        let (uri, mime, text) = parts(&result.contents[0]);
        assert_eq!(uri, "moodleapi://api/mod#json");
        assert_eq!(mime, Some("application/json"));
        let detail: serde_json::Value = serde_json::from_str(text).unwrap();
        assert_eq!(detail["anchorId"], "plugintypes-mod");
        assert_eq!(detail["generatedAt"], "2026-10-17T08:30:00.000Z");

        let (uri, mime, text) = parts(&result.contents[1]);
        assert_eq!(uri, "moodleapi://api/mod#markdown");
        assert_eq!(mime, Some("text/markdown"));
        assert!(text.starts_with("# Activity modules (mod)"));
    }

    #[test]
    fn read_category_resource() {
        let result = server().read("moodleapi://category/core-apis").unwrap();
        let (uri, _, text) = parts(&result.contents[0]);
        assert_eq!(uri, "moodleapi://category/core-apis#json");
        let detail: CategoryDetailResponse = serde_json::from_str(text).unwrap();
        assert_eq!(detail.entry_count, 4);
        assert_eq!(detail.apis[2].slug, "cache-2");
    }

    #[test]
    fn read_unknown_resources_fails() {
        assert!(server().read("moodleapi://api/gradebook").is_err());
        assert!(server().read("moodleapi://category/nope").is_err());
        assert!(server().read("moodleapi://elsewhere").is_err());
    }

    #[test]
    fn completes_template_arguments_by_prefix() {
        let server = server();
        let slug = |value: &str| {
            server.completion(
                &Reference::for_resource("moodleapi://api/{slug}"),
                &ArgumentInfo {
                    name: "slug".to_string(),
                    value: value.to_string(),
                },
            )
        };
        assert_eq!(slug("cache").values, vec!["cache", "cache-2"]);
        assert_eq!(slug("").values.len(), 7);

        let category = server.completion(
            &Reference::for_resource("moodleapi://category/{categoryId}"),
            &ArgumentInfo {
                name: "categoryId".to_string(),
                value: "C".to_string(),
            },
        );
        assert_eq!(category.values, vec!["caching-api", "core-apis"]);

        let mismatched = server.completion(
            &Reference::for_resource("moodleapi://api/{slug}"),
            &ArgumentInfo {
                name: "categoryId".to_string(),
                value: String::new(),
            },
        );
        assert!(mismatched.values.is_empty());
        assert!(
            server
                .completion(
                    &Reference::for_prompt("anything"),
                    &ArgumentInfo {
                        name: "slug".to_string(),
                        value: String::new(),
                    },
                )
                .values
                .is_empty()
        );
    }
}
