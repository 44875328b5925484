//! Descriptors for the platform's resource kinds.
//!
//! Each static describes one kind; [`all`] lists them and [`lookup`] finds one
//! by key. Top-level kinds are anchored at the admin API (or master API, or
//! the tenant root); the rest are nested below a parent resource.

use super::kind::{Anchor, ResourceKind};

const ACCOUNT_STATES: &[&str] = &["approve", "reject", "make_pending"];
const APPLICATION_STATES: &[&str] = &["accept", "suspend", "resume"];
const USER_STATES: &[&str] = &[
    "suspend",
    "unsuspend",
    "resume",
    "activate",
    "set_as_admin",
    "set_as_member",
    "admin",
    "member",
];
const PROVIDER_USER_STATES: &[&str] = &["member", "admin", "suspend", "unsuspend", "activate"];

// ============================================================================
// Services and their configuration
// ============================================================================

/// API products (`/admin/api/services`).
pub static SERVICE: ResourceKind = ResourceKind::new("service", "service", "services")
    .anchored(Anchor::AdminApi)
    .named_by("system_name");

/// The gateway configuration of a service (`<service>/proxy`).
pub static PROXY: ResourceKind = ResourceKind::new("proxy", "proxy", "proxy").singleton();

/// Promoted gateway configurations (`<proxy>/configs[/<env>]`).
pub static PROXY_CONFIG: ResourceKind =
    ResourceKind::new("proxy_config", "proxy_config", "configs")
        .collection("proxy_configs")
        .named_by("version");

/// OpenID Connect settings of a proxy (`<proxy>/oidc_configuration`).
pub static OIDC_CONFIGURATION: ResourceKind = ResourceKind::new(
    "oidc_configuration",
    "oidc_configuration",
    "oidc_configuration",
)
.singleton();

/// The policy chain of a proxy (`<proxy>/policies`).
pub static POLICY_CHAIN: ResourceKind = ResourceKind::new("policy_chain", "policy", "policies")
    .collection("policies")
    .singleton();

/// Mapping rules of a proxy or backend.
pub static MAPPING_RULE: ResourceKind =
    ResourceKind::new("mapping_rule", "mapping_rule", "mapping_rules").named_by("pattern");

/// Metrics of a service.
pub static METRIC: ResourceKind =
    ResourceKind::new("metric", "metric", "metrics").named_by("system_name");

/// Methods of a metric.
pub static METHOD: ResourceKind =
    ResourceKind::new("method", "method", "methods").named_by("system_name");

/// Application plans of a service.
pub static APPLICATION_PLAN: ResourceKind =
    ResourceKind::new("application_plan", "application_plan", "application_plans")
        .collection("plans")
        .named_by("system_name")
        .plan();

/// Features of an application plan.
pub static APPLICATION_PLAN_FEATURE: ResourceKind =
    ResourceKind::new("application_plan_feature", "feature", "features")
        .named_by("system_name");

/// Usage limits of a plan for one metric.
pub static LIMIT: ResourceKind = ResourceKind::new("limit", "limit", "limits").named_by("period");

/// Pricing rules of a plan for one metric.
pub static PRICING_RULE: ResourceKind =
    ResourceKind::new("pricing_rule", "pricing_rule", "pricing_rules");

/// Service plans of a service.
pub static SERVICE_PLAN: ResourceKind =
    ResourceKind::new("service_plan", "service_plan", "service_plans")
        .collection("plans")
        .named_by("system_name")
        .plan();

/// Backend usages of a service.
pub static BACKEND_USAGE: ResourceKind =
    ResourceKind::new("backend_usage", "backend_usage", "backend_usages").named_by("path");

// ============================================================================
// Accounts and applications
// ============================================================================

/// Developer accounts (`/admin/api/accounts`); created through `/signup`.
pub static ACCOUNT: ResourceKind = ResourceKind::new("account", "account", "accounts")
    .anchored(Anchor::AdminApi)
    .named_by("org_name")
    .with_states(ACCOUNT_STATES)
    .created_at("signup");

/// Users of a developer account.
pub static ACCOUNT_USER: ResourceKind = ResourceKind::new("account_user", "user", "users")
    .named_by("username")
    .with_states(USER_STATES);

/// Applications of a developer account.
pub static APPLICATION: ResourceKind =
    ResourceKind::new("application", "application", "applications")
        .with_states(APPLICATION_STATES);

/// Keys of an application.
pub static APPLICATION_KEY: ResourceKind =
    ResourceKind::new("application_key", "key", "keys").named_by("value");

/// Referrer filters of an application.
pub static REFERRER_FILTER: ResourceKind =
    ResourceKind::new("referrer_filter", "referrer_filter", "referrer_filters")
        .named_by("value");

/// Account plans (`/admin/api/account_plans`).
pub static ACCOUNT_PLAN: ResourceKind =
    ResourceKind::new("account_plan", "account_plan", "account_plans")
        .collection("plans")
        .anchored(Anchor::AdminApi)
        .plan();

// ============================================================================
// Backends
// ============================================================================

/// Backend APIs (`/admin/api/backend_apis`), listed 500 per page.
pub static BACKEND: ResourceKind = ResourceKind::new("backend", "backend_api", "backend_apis")
    .anchored(Anchor::AdminApi)
    .named_by("system_name")
    .paginated(500);

/// Metrics of a backend.
pub static BACKEND_METRIC: ResourceKind =
    ResourceKind::new("backend_metric", "metric", "metrics").named_by("system_name");

/// Mapping rules of a backend.
pub static BACKEND_MAPPING_RULE: ResourceKind =
    ResourceKind::new("backend_mapping_rule", "mapping_rule", "mapping_rules")
        .named_by("pattern");

// ============================================================================
// Tenant-wide collections
// ============================================================================

/// API documentation specs (`/admin/api/active_docs`).
pub static ACTIVE_DOC: ResourceKind = ResourceKind::new("active_doc", "api_doc", "active_docs")
    .collection("api_docs")
    .anchored(Anchor::AdminApi)
    .named_by("system_name");

/// Admin portal users as seen by a provider (`/admin/api/providers`).
pub static PROVIDER: ResourceKind = ResourceKind::new("provider", "user", "providers")
    .collection("users")
    .anchored(Anchor::AdminApi)
    .named_by("org_name");

/// Tenants (`/master/api/providers`), id at `signup.account.id`.
pub static TENANT: ResourceKind = ResourceKind::new("tenant", "tenant", "providers")
    .anchored(Anchor::MasterApi)
    .named_by("/signup/account/org_name")
    .id_at("/signup/account/id");

/// Personal access tokens (`/admin/api/personal/access_tokens`).
pub static ACCESS_TOKEN: ResourceKind =
    ResourceKind::new("access_token", "access_token", "personal/access_tokens")
        .anchored(Anchor::AdminApi);

/// Custom policies in the registry (`/admin/api/registry/policies`).
pub static POLICY_REGISTRY: ResourceKind =
    ResourceKind::new("policy_registry", "policy", "registry/policies")
        .collection("policies")
        .anchored(Anchor::AdminApi);

/// Invoices (`<url>/api/invoices`).
pub static INVOICE: ResourceKind = ResourceKind::new("invoice", "invoice", "api/invoices")
    .anchored(Anchor::TenantRoot)
    .named_by("friendly_id");

/// Line items of an invoice.
pub static LINE_ITEM: ResourceKind = ResourceKind::new("line_item", "line_item", "line_items");

/// Payment transactions of an invoice.
pub static PAYMENT_TRANSACTION: ResourceKind = ResourceKind::new(
    "payment_transaction",
    "payment_transaction",
    "payment_transactions",
);

/// Custom field definitions (`/admin/api/fields_definitions`).
pub static FIELDS_DEFINITION: ResourceKind =
    ResourceKind::new("fields_definition", "fields_definition", "fields_definitions")
        .anchored(Anchor::AdminApi);

/// Developer portal SSO providers (`/admin/api/authentication_providers`).
pub static DEV_PORTAL_AUTH_PROVIDER: ResourceKind = ResourceKind::new(
    "dev_portal_auth_provider",
    "authentication_provider",
    "authentication_providers",
)
.anchored(Anchor::AdminApi);

/// Admin portal SSO providers (`/admin/api/account/authentication_providers`).
pub static ADMIN_PORTAL_AUTH_PROVIDER: ResourceKind = ResourceKind::new(
    "admin_portal_auth_provider",
    "authentication_provider",
    "account/authentication_providers",
)
.collection("authentication_providers")
.anchored(Anchor::AdminApi);

/// Webhook settings (`/admin/api/webhooks`).
pub static WEBHOOK: ResourceKind = ResourceKind::new("webhook", "webhook", "webhooks")
    .anchored(Anchor::AdminApi)
    .singleton();

/// Tenant settings (`/admin/api/settings`).
pub static SETTINGS: ResourceKind = ResourceKind::new("settings", "settings", "settings")
    .anchored(Anchor::AdminApi)
    .singleton();

/// The current provider account (`/admin/api/provider`).
pub static PROVIDER_ACCOUNT: ResourceKind =
    ResourceKind::new("provider_account", "account", "provider")
        .anchored(Anchor::AdminApi)
        .named_by("org_name")
        .singleton();

/// Users of the provider account (`/admin/api/users`).
pub static PROVIDER_ACCOUNT_USER: ResourceKind =
    ResourceKind::new("provider_account_user", "user", "users")
        .anchored(Anchor::AdminApi)
        .named_by("username")
        .with_states(PROVIDER_USER_STATES);

static ALL: &[&ResourceKind] = &[
    &SERVICE,
    &PROXY,
    &PROXY_CONFIG,
    &OIDC_CONFIGURATION,
    &POLICY_CHAIN,
    &MAPPING_RULE,
    &METRIC,
    &METHOD,
    &APPLICATION_PLAN,
    &APPLICATION_PLAN_FEATURE,
    &LIMIT,
    &PRICING_RULE,
    &SERVICE_PLAN,
    &BACKEND_USAGE,
    &ACCOUNT,
    &ACCOUNT_USER,
    &APPLICATION,
    &APPLICATION_KEY,
    &REFERRER_FILTER,
    &ACCOUNT_PLAN,
    &BACKEND,
    &BACKEND_METRIC,
    &BACKEND_MAPPING_RULE,
    &ACTIVE_DOC,
    &PROVIDER,
    &TENANT,
    &ACCESS_TOKEN,
    &POLICY_REGISTRY,
    &INVOICE,
    &LINE_ITEM,
    &PAYMENT_TRANSACTION,
    &FIELDS_DEFINITION,
    &DEV_PORTAL_AUTH_PROVIDER,
    &ADMIN_PORTAL_AUTH_PROVIDER,
    &WEBHOOK,
    &SETTINGS,
    &PROVIDER_ACCOUNT,
    &PROVIDER_ACCOUNT_USER,
];

/// Returns every registered kind.
pub fn all() -> &'static [&'static ResourceKind] {
    ALL
}

/// Finds a kind by its key.
pub fn lookup(key: &str) -> Option<&'static ResourceKind> {
    ALL.iter().copied().find(|kind| kind.key() == key)
}
