//! Tool registry for MCP tools.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::report::NewsService;

use super::handlers::{DailyReportHandler, FetchNewsHandler, FetchPapersHandler, WeeklyReportHandler};

/// An MCP tool that can be called by the client
#[derive(Clone)]
pub struct Tool {
    /// Tool name (e.g., "fetch_ai_news")
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// JSON Schema for input parameters
    pub input_schema: serde_json::Value,

    /// Handler function to execute the tool
    pub handler: Arc<dyn ToolHandler>,
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .finish()
    }
}

/// Handler for executing a tool
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync + std::fmt::Debug {
    /// Execute the tool with the given arguments
    async fn execute(&self, args: Value) -> Result<Value, String>;
}

/// Registry for all MCP tools
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Tool>,
}

impl ToolRegistry {
    /// Create a registry exposing the four report operations
    pub fn from_service(service: Arc<NewsService>) -> Self {
        let mut registry = Self {
            tools: BTreeMap::new(),
        };
        let feed_count = service.registry().len();

        registry.register(Tool {
            name: FetchNewsHandler::NAME.to_string(),
            description: format!(
                "Fetch recent AI news from {} curated feeds as a Markdown report",
                feed_count
            ),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "time_range": {
                        "type": "string",
                        "enum": ["daily", "weekly", "monthly"],
                        "description": "Lookback window: 24 hours, 7 days or 30 days",
                        "default": "daily"
                    },
                    "category": {
                        "type": "string",
                        "enum": ["all", "research", "news", "gaming"],
                        "description": "Feed category to include",
                        "default": "all"
                    },
                    "limit": {
                        "type": "integer",
                        "minimum": 1,
                        "description": "Maximum number of items",
                        "default": 20
                    }
                }
            }),
            handler: Arc::new(FetchNewsHandler {
                service: Arc::clone(&service),
            }),
        });

        registry.register(Tool {
            name: FetchPapersHandler::NAME.to_string(),
            description: "List the latest arXiv papers in AI-related subjects, newest first"
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "category": {
                        "type": "string",
                        "enum": ["all", "cs.AI", "cs.CL", "cs.CV", "cs.LG", "cs.MA"],
                        "description": "arXiv subject, or 'all' for every listed subject",
                        "default": "all"
                    },
                    "max_results": {
                        "type": "integer",
                        "minimum": 1,
                        "description": "Maximum number of papers",
                        "default": 10
                    }
                }
            }),
            handler: Arc::new(FetchPapersHandler {
                service: Arc::clone(&service),
            }),
        });

        registry.register(Tool {
            name: DailyReportHandler::NAME.to_string(),
            description: "Build a daily AI report with one section per category plus narrative placeholders"
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "include_categories": {
                        "type": "array",
                        "items": {
                            "type": "string",
                            "enum": ["research", "news", "gaming", "papers"]
                        },
                        "description": "Sections to include, in order",
                        "default": ["research", "news", "gaming"]
                    }
                }
            }),
            handler: Arc::new(DailyReportHandler {
                service: Arc::clone(&service),
            }),
        });

        registry.register(Tool {
            name: WeeklyReportHandler::NAME.to_string(),
            description: "Build a weekly AI report with a roundup, focus-area sections and narrative placeholders"
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "focus_areas": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Free-text focus labels, one section each",
                        "default": ["gaming", "generative-ai", "multimodal"]
                    }
                }
            }),
            handler: Arc::new(WeeklyReportHandler { service }),
        });

        registry
    }

    /// Register a tool
    pub fn register(&mut self, tool: Tool) {
        self.tools.insert(tool.name.clone(), tool);
    }

    /// Get all tools, ordered by name
    pub fn all(&self) -> Vec<&Tool> {
        self.tools.values().collect()
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    /// Execute a tool by name
    pub async fn execute(&self, name: &str, args: Value) -> Result<Value, String> {
        let tool = self
            .get(name)
            .ok_or_else(|| format!("Tool '{}' not found", name))?;

        tool.handler.execute(args).await
    }
}
