//! Conversions from engine values to response bodies.

use api_types::{
    Expandable,
    category::{CategoryType as CategoryTypeView, CategoryView},
    currency::CurrencyView,
    project::ProjectView,
    user::UserView,
};
use engine::{Category, CategoryType, Currency, Project, Ref, User};

fn expandable<T, V>(reference: Ref<T>, view: fn(T) -> V) -> Expandable<V> {
    match reference {
        Ref::Id(id) => Expandable::Id(id),
        Ref::Expanded(entity) => Expandable::Expanded(view(entity)),
    }
}

pub(crate) fn user_view(user: User) -> UserView {
    UserView {
        username: user.username,
        display_name: user.display_name,
        projects: user.projects,
    }
}

pub(crate) fn currency_view(currency: Currency) -> CurrencyView {
    CurrencyView {
        id: currency.id,
        code: currency.code,
        name: currency.name,
        symbol: currency.symbol,
    }
}

pub(crate) fn project_view(project: Project) -> ProjectView {
    ProjectView {
        id: project.id,
        name: project.name,
        owners: project
            .owners
            .into_iter()
            .map(|owner| expandable(owner, user_view))
            .collect(),
        users: project
            .users
            .into_iter()
            .map(|user| expandable(user, user_view))
            .collect(),
        main_currency: project
            .main_currency
            .map(|main| expandable(main, currency_view)),
        currencies: project
            .currencies
            .into_iter()
            .map(|currency| expandable(currency, currency_view))
            .collect(),
        categories: project.categories,
        created: project.created,
        created_by: expandable(project.created_by, user_view),
        modified_by: expandable(project.modified_by, user_view),
    }
}

pub(crate) fn category_type(value: CategoryTypeView) -> CategoryType {
    match value {
        CategoryTypeView::Income => CategoryType::Income,
        CategoryTypeView::Expense => CategoryType::Expense,
    }
}

pub(crate) fn category_view(category: Category) -> CategoryView {
    CategoryView {
        id: category.id,
        project_id: category.project_id,
        name: category.name,
        category_type: match category.category_type {
            CategoryType::Income => CategoryTypeView::Income,
            CategoryType::Expense => CategoryTypeView::Expense,
        },
        parent: category.parent_id,
    }
}
