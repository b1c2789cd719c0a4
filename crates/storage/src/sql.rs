//! SQL fragments shared by both backends.

use shelfscore_core::BookSort;

/// `ORDER BY` body for a book listing. Missing sort keys go last; title breaks ties.
pub(crate) const fn book_order_by(sort: BookSort) -> &'static str {
    match sort {
        BookSort::Newest => "published_date IS NULL, published_date DESC, title",
        BookSort::CriticScore => {
            "calculated_critic_score IS NULL, calculated_critic_score DESC, title"
        },
        BookSort::CreatedAt => "created_at DESC, title",
    }
}

/// Review listing order: newest review first, undated last.
pub(crate) const REVIEW_ORDER_BY: &str = "review_date IS NULL, review_date DESC, critic_name";
