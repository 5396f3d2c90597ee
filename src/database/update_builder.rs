use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::QueryAs;
use sqlx::{FromRow, Postgres};

use crate::database::manager::DatabaseError;

/// A value bound to a positional placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Text(String),
    Bool(bool),
    Int(i32),
}

/// One `(column, optional value)` pair of a patch.
/// Columns are compile-time names; only values reach the statement as parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    column: &'static str,
    value: Option<SqlParam>,
}

impl Assignment {
    pub fn text(column: &'static str, value: Option<String>) -> Self {
        Self { column, value: value.map(SqlParam::Text) }
    }

    pub fn boolean(column: &'static str, value: Option<bool>) -> Self {
        Self { column, value: value.map(SqlParam::Bool) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStatement {
    pub query: String,
    pub params: Vec<SqlParam>,
}

/// Builds `UPDATE .. SET .. WHERE id = $n RETURNING ..` from ordered assignments
pub struct UpdateBuilder {
    table: &'static str,
    returning: &'static str,
}

impl UpdateBuilder {
    pub fn new(table: &'static str, returning: &'static str) -> Self {
        Self { table, returning }
    }

    pub fn build(&self, id: i32, assignments: Vec<Assignment>) -> Result<UpdateStatement, DatabaseError> {
        let mut set_clauses = Vec::with_capacity(assignments.len());
        let mut params = Vec::with_capacity(assignments.len() + 1);

        for Assignment { column, value } in assignments {
            if let Some(value) = value {
                params.push(value);
                set_clauses.push(format!("{} = ${}", column, params.len()));
            }
        }

        // An empty SET list is not valid SQL
        if set_clauses.is_empty() {
            return Err(DatabaseError::EmptyUpdate);
        }

        params.push(SqlParam::Int(id));
        let query = format!(
            "UPDATE {} SET {} WHERE id = ${} RETURNING {}",
            self.table,
            set_clauses.join(", "),
            params.len(),
            self.returning
        );

        Ok(UpdateStatement { query, params })
    }
}

impl UpdateStatement {
    /// Prepares the statement with every parameter bound in order
    pub fn query_as<'q, O>(&'q self) -> QueryAs<'q, Postgres, O, PgArguments>
    where
        O: for<'r> FromRow<'r, PgRow>,
    {
        let mut q = sqlx::query_as::<_, O>(&self.query);
        for p in self.params.iter() {
            q = bind_param_query_as(q, p);
        }
        q
    }
}

fn bind_param_query_as<'q, O>(
    q: QueryAs<'q, Postgres, O, PgArguments>,
    v: &'q SqlParam,
) -> QueryAs<'q, Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match v {
        SqlParam::Text(s) => q.bind(s),
        SqlParam::Bool(b) => q.bind(*b),
        SqlParam::Int(i) => q.bind(*i),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{UpdateItemData, UpdateListData};

    fn lists() -> UpdateBuilder {
        UpdateBuilder::new("todo_lists", "id, title, description")
    }

    #[test]
    fn title_only_patch() {
        let patch = UpdateListData { title: Some("Groceries".into()), description: None };
        let stmt = lists().build(7, patch.assignments()).unwrap();

        assert_eq!(
            stmt.query,
            "UPDATE todo_lists SET title = $1 WHERE id = $2 RETURNING id, title, description"
        );
        assert_eq!(stmt.params, vec![SqlParam::Text("Groceries".into()), SqlParam::Int(7)]);
    }

    #[test]
    fn description_only_patch_still_starts_at_one() {
        let patch = UpdateListData { title: None, description: Some("weekly".into()) };
        let stmt = lists().build(3, patch.assignments()).unwrap();

        assert_eq!(
            stmt.query,
            "UPDATE todo_lists SET description = $1 WHERE id = $2 RETURNING id, title, description"
        );
        assert_eq!(stmt.params, vec![SqlParam::Text("weekly".into()), SqlParam::Int(3)]);
    }

    #[test]
    fn fields_keep_fixed_order() {
        let patch = UpdateItemData {
            title: Some("milk".into()),
            description: Some("2%".into()),
            done: Some(true),
        };
        let stmt = UpdateBuilder::new("todo_items", "id, title, description, done")
            .build(11, patch.assignments())
            .unwrap();

        assert_eq!(
            stmt.query,
            "UPDATE todo_items SET title = $1, description = $2, done = $3 WHERE id = $4 RETURNING id, title, description, done"
        );
        assert_eq!(
            stmt.params,
            vec![
                SqlParam::Text("milk".into()),
                SqlParam::Text("2%".into()),
                SqlParam::Bool(true),
                SqlParam::Int(11),
            ]
        );
    }

    #[test]
    fn values_are_never_interpolated() {
        let hostile = "x'; DROP TABLE users; --".to_string();
        let patch = UpdateListData { title: Some(hostile.clone()), description: None };
        let stmt = lists().build(1, patch.assignments()).unwrap();

        assert!(!stmt.query.contains("DROP"));
        assert_eq!(stmt.params[0], SqlParam::Text(hostile));
    }

    #[test]
    fn empty_patch_is_rejected() {
        let err = lists().build(1, UpdateListData::default().assignments()).unwrap_err();
        assert!(matches!(err, DatabaseError::EmptyUpdate));
    }
}
