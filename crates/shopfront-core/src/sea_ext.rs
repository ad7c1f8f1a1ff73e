use sea_orm::{
    ColumnTrait, EntityTrait, QueryFilter, Select,
    sea_query::{Expr, Func, LikeExpr},
};

const LIKE_ESCAPE: char = '\\';

/// Escape `%`, `_` and the escape character itself for use in a LIKE pattern.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            out.push(LIKE_ESCAPE);
        }
        out.push(c);
    }
    out
}

pub trait FilterPrefix {
    /// Keep rows where `lower(column)` starts with `lower(prefix)`.
    fn filter_prefix_ci<C: ColumnTrait>(self, column: C, prefix: &str) -> Self;
}

impl<E> FilterPrefix for Select<E>
where
    E: EntityTrait,
{
    fn filter_prefix_ci<C: ColumnTrait>(self, column: C, prefix: &str) -> Self {
        let pattern = format!("{}%", escape_like(&prefix.to_lowercase()));
        self.filter(
            Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern).escape(LIKE_ESCAPE)),
        )
    }
}
