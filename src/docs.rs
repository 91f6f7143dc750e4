// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Agencies ---
        handlers::agencies::list_agencies,
        handlers::agencies::create_agency,
        handlers::agencies::get_agency,
        handlers::agencies::update_agency,
        handlers::agencies::delete_agency,
        handlers::agencies::set_primary_contact,
        handlers::agencies::list_profiles,
        handlers::agencies::create_profile,
        handlers::agencies::update_profile,
        handlers::agencies::toggle_profile,

        // --- Users ---
        handlers::clients::list_users,
        handlers::clients::create_user,
        handlers::clients::get_user,
        handlers::clients::update_user,
        handlers::clients::delete_user,
        handlers::clients::add_contact,
        handlers::clients::remove_contact,

        // --- Catalog ---
        handlers::catalog::list_activities,
        handlers::catalog::create_activity,
        handlers::catalog::update_activity,
        handlers::catalog::delete_activity,
        handlers::catalog::list_banks,
        handlers::catalog::create_bank,
        handlers::catalog::get_bank,
        handlers::catalog::update_bank,
        handlers::catalog::delete_bank,

        // --- Companies ---
        handlers::companies::list_companies,
        handlers::companies::create_company,
        handlers::companies::get_company,
        handlers::companies::update_company,
        handlers::companies::delete_company,
        handlers::companies::add_tier,
        handlers::companies::remove_tier,

        // --- Gateways ---
        handlers::gateways::list_gateways,
        handlers::gateways::get_gateway,
        handlers::gateways::save_gateway,

        // --- Content ---
        handlers::content::list_texts,
        handlers::content::get_text,
        handlers::content::save_text,
        handlers::content::list_slides,
        handlers::content::create_slide,
        handlers::content::update_slide,
        handlers::content::toggle_slide,
        handlers::content::move_slide,
        handlers::content::delete_slide,

        // --- Orders ---
        handlers::orders::list_orders,
        handlers::orders::create_order,
        handlers::orders::get_order,
        handlers::orders::transition_order,
        handlers::orders::approve_payment,
        handlers::orders::cancel_order,

        // --- Shell ---
        handlers::shell::menu,
        handlers::shell::resolve,
        handlers::shell::lookup_postal_code,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::Identity,
            models::auth::Client,
            models::auth::CreateClientPayload,
            models::auth::UpdateClientPayload,
            models::auth::LoginPayload,
            models::auth::AuthResponse,
            models::auth::MeResponse,

            // --- Cadastros ---
            models::address::Address,
            models::contact::Contact,
            models::agency::Agency,
            models::agency::AgencyPayload,
            models::agency::AgencyProfile,
            models::agency::AgencyProfilePayload,
            models::agency::PrimaryContactPayload,
            models::activity::Activity,
            models::activity::ActivityPayload,
            models::bank::Bank,
            models::bank::CreateBankPayload,
            models::bank::UpdateBankPayload,

            // --- Companies ---
            models::company::Currency,
            models::company::Nationality,
            models::company::Company,
            models::company::CompanyPayload,
            models::company::AddTierPayload,
            models::mileage::MileageTier,

            // --- Gateways ---
            models::gateway::GatewayProvider,
            models::gateway::GatewaySummary,
            models::gateway::GatewayFieldView,
            models::gateway::GatewayDetail,
            models::gateway::SaveGatewayPayload,

            // --- Content ---
            models::content::SiteText,
            models::content::SaveTextPayload,
            models::content::Slide,
            models::content::SlidePayload,
            models::content::MoveDirection,
            models::content::MoveSlidePayload,

            // --- Orders ---
            models::order::OrderStatus,
            models::order::Order,
            models::order::CreateOrderPayload,
            models::order::TransitionPayload,

            // --- Shell ---
            models::navigation::PageKey,
            models::navigation::Page,
            models::navigation::MenuEntry,
            models::navigation::NavigatePayload,
            models::navigation::ResolvedPage,
            services::postal_service::PostalAddress,
        )
    ),
    tags(
        (name = "Auth", description = "Login e identidade logada"),
        (name = "Agencies", description = "Agências parceiras"),
        (name = "Agency Profiles", description = "Perfis de agência (exclusão lógica)"),
        (name = "Users", description = "Usuários do sistema e seus contatos"),
        (name = "Activities", description = "Ramos de atuação"),
        (name = "Banks", description = "Bancos"),
        (name = "Companies", description = "Companhias aéreas e faixas de milhas"),
        (name = "Gateways", description = "Credenciais dos gateways de pagamento"),
        (name = "Texts", description = "Textos e políticas do site"),
        (name = "Slides", description = "Slides da home"),
        (name = "Orders", description = "Ordens de pedido (OP)"),
        (name = "Navigation", description = "Menu e navegação entre telas"),
        (name = "Postal", description = "Consulta de CEP")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
