use async_trait::async_trait;
use reqwest::StatusCode;
use slog::debug;
use std::fmt::{Display, Formatter};

use crate::query::{AirtableQuery, QueryContext, QueryLogFields, QueryMethod, ResponseExt};
use crate::{AirtableClientResult, FilterFormula, RecordPage};

/// Query to get one page of the records of a table
pub struct ListRecordsQuery {
    table_name: String,
    page_size: u32,
    scope: ListScope,
}

enum ListScope {
    /// First page of the records matching a formula.
    Filtered(FilterFormula),
    /// Page of all records, starting at the given continuation offset.
    Page(Option<String>),
}

impl Display for ListScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self {
            ListScope::Filtered(formula) => write!(f, "filtered({formula})"),
            ListScope::Page(None) => write!(f, "first page"),
            ListScope::Page(Some(offset)) => write!(f, "page({offset})"),
        }
    }
}

impl ListRecordsQuery {
    /// Instantiate a query to get the first page of the records matching the given formula
    pub fn first_page<T: Into<String>>(
        table_name: T,
        page_size: u32,
        formula: FilterFormula,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            page_size,
            scope: ListScope::Filtered(formula),
        }
    }

    /// Instantiate a query to get a page of all the records, `None` offset meaning the first one
    pub fn page<T: Into<String>>(table_name: T, page_size: u32, offset: Option<String>) -> Self {
        Self {
            table_name: table_name.into(),
            page_size,
            scope: ListScope::Page(offset),
        }
    }
}

#[async_trait]
impl AirtableQuery for ListRecordsQuery {
    type Response = RecordPage;
    type Body = ();

    fn method() -> QueryMethod {
        QueryMethod::Get
    }

    fn route(&self) -> Vec<String> {
        vec![self.table_name.clone()]
    }

    fn query_parameters(&self) -> Vec<(&'static str, String)> {
        let mut parameters = vec![("pageSize", self.page_size.to_string())];
        match &self.scope {
            ListScope::Filtered(formula) => {
                parameters.push(("filterByFormula", formula.to_string()));
            }
            ListScope::Page(Some(offset)) => parameters.push(("offset", offset.clone())),
            ListScope::Page(None) => {}
        }

        parameters
    }

    fn entry_log_additional_fields(&self) -> QueryLogFields {
        QueryLogFields::from([("scope", self.scope.to_string())])
    }

    async fn handle_response(&self, context: QueryContext) -> AirtableClientResult<Self::Response> {
        debug!(
            context.logger, "/GET: List records";
            "table" => &self.table_name, "scope" => %self.scope
        );

        match context.response.status() {
            StatusCode::OK => context.response.parse_json().await,
            _ => Err(context.unhandled_status_code().await),
        }
    }
}
