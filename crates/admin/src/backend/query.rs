//! Request shaping for table reads and writes.

use url::Url;

/// Sort instruction for a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: &'static str,
    pub ascending: bool,
}

impl Order {
    #[must_use]
    pub const fn asc(column: &'static str) -> Self {
        Self {
            column,
            ascending: true,
        }
    }

    #[must_use]
    pub const fn desc(column: &'static str) -> Self {
        Self {
            column,
            ascending: false,
        }
    }

    fn render(&self) -> String {
        let direction = if self.ascending { "asc" } else { "desc" };
        format!("{}.{direction}", self.column)
    }
}

/// Equality filter on a column (`column=eq.value`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: &'static str,
    pub value: String,
}

impl Filter {
    #[must_use]
    pub fn eq(column: &'static str, value: impl ToString) -> Self {
        Self {
            column,
            value: value.to_string(),
        }
    }

    pub(crate) fn apply(&self, url: &mut Url) {
        url.query_pairs_mut()
            .append_pair(self.column, &format!("eq.{}", self.value));
    }
}

/// A read against one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Select {
    columns: String,
    filters: Vec<Filter>,
    order: Vec<Order>,
}

impl Select {
    /// Select every column.
    #[must_use]
    pub fn all() -> Self {
        Self::columns("*")
    }

    /// Select an explicit column list, including embedded relations
    /// such as `*,category:content_categories(*)`.
    #[must_use]
    pub fn columns(columns: impl Into<String>) -> Self {
        Self {
            columns: columns.into(),
            filters: Vec::new(),
            order: Vec::new(),
        }
    }

    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    #[must_use]
    pub fn eq(self, column: &'static str, value: impl ToString) -> Self {
        self.filter(Filter::eq(column, value))
    }

    #[must_use]
    pub fn order(mut self, order: Order) -> Self {
        self.order.push(order);
        self
    }

    #[must_use]
    pub fn order_by(mut self, order: &[Order]) -> Self {
        self.order.extend_from_slice(order);
        self
    }

    pub(crate) fn apply(&self, url: &mut Url) {
        url.query_pairs_mut().append_pair("select", &self.columns);
        for filter in &self.filters {
            filter.apply(url);
        }
        if !self.order.is_empty() {
            let order = self
                .order
                .iter()
                .map(Order::render)
                .collect::<Vec<_>>()
                .join(",");
            url.query_pairs_mut().append_pair("order", &order);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn render(select: &Select) -> String {
        let mut url = Url::parse("http://localhost/rest/v1/t").unwrap();
        select.apply(&mut url);
        url.query().unwrap_or_default().to_string()
    }

    #[test]
    fn test_select_all_without_order() {
        assert_eq!(render(&Select::all()), "select=*");
    }

    #[test]
    fn test_select_with_filter_and_multi_order() {
        let select = Select::all()
            .eq("id", "abc")
            .order(Order::asc("category"))
            .order(Order::desc("created_at"));
        assert_eq!(
            render(&select),
            "select=*&id=eq.abc&order=category.asc%2Ccreated_at.desc"
        );
    }

    #[test]
    fn test_embedded_columns_are_encoded() {
        let select = Select::columns("*,category:content_categories(*)");
        assert_eq!(
            render(&select),
            "select=*%2Ccategory%3Acontent_categories%28*%29"
        );
    }
}
