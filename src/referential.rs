//! Settings of the referential import page: which file types each
//! referential accepts, where it is uploaded and what the page shows.

use serde::Serialize;

const IMPORT_ERROR: &str = "Echec de l'import du fichier.";
const FALLBACK_ROUTE: &str = "ingest/sip";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReferentialType {
    Context,
    AccessContract,
    IngestContract,
    Format,
    #[serde(rename = "profil")]
    Profile,
    Rule,
    ArchiveUnitProfile,
    Ontology,
    Scenarios,
    Griffins,
    Agencies,
}

impl ReferentialType {
    /// Display order of the import page selector.
    pub const ALL: [Self; 11] = [
        Self::Context,
        Self::AccessContract,
        Self::IngestContract,
        Self::Format,
        Self::Profile,
        Self::Rule,
        Self::ArchiveUnitProfile,
        Self::Ontology,
        Self::Scenarios,
        Self::Griffins,
        Self::Agencies,
    ];

    pub fn from_route_param(param: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.route_param() == param)
    }

    pub fn route_param(self) -> &'static str {
        match self {
            Self::Context => "context",
            Self::AccessContract => "accessContract",
            Self::IngestContract => "ingestContract",
            Self::Format => "format",
            Self::Profile => "profil",
            Self::Rule => "rule",
            Self::ArchiveUnitProfile => "archiveUnitProfile",
            Self::Ontology => "ontology",
            Self::Scenarios => "scenarios",
            Self::Griffins => "griffins",
            Self::Agencies => "agencies",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Context => "Contextes applicatifs",
            Self::AccessContract => "Contrats d'accès",
            Self::IngestContract => "Contrats d'entrée",
            Self::Format => "Formats",
            Self::Profile => "Profils d'archivage",
            Self::Rule => "Règles de gestion",
            Self::ArchiveUnitProfile => "Documents type",
            Self::Ontology => "Ontologies",
            Self::Scenarios => "Scenario de préservation",
            Self::Griffins => "Griffons",
            Self::Agencies => "Services agents",
        }
    }

    /// Referentials only a tenant administrator may import.
    pub fn requires_tenant_admin(self) -> bool {
        matches!(self, Self::Format | Self::Context | Self::Ontology | Self::Griffins)
    }

    pub fn settings(self) -> ImportSettings {
        let (extension, upload_api, success_message, breadcrumb) = match self {
            Self::AccessContract => (
                "json",
                "accesscontracts",
                "Les contrats d'accès ont bien été importés",
                "Import des contrats d'accès",
            ),
            Self::IngestContract => (
                "json",
                "contracts",
                "Les contrats d'entrée ont bien été importés",
                "Import des contrats d'entrée",
            ),
            Self::ArchiveUnitProfile => (
                "json",
                "archiveunitprofiles",
                "Les documents type ont bien été importés",
                "Import des documents type",
            ),
            Self::Format => (
                "xml",
                "format/upload",
                "Les formats ont bien été importés",
                "Import des formats",
            ),
            Self::Rule => (
                "csv",
                "rules/upload",
                "Les règles de gestion ont bien été importées",
                "Import des règles de gestion",
            ),
            Self::Profile => (
                "json",
                "profiles",
                "Les profils d'archivage ont bien été importés",
                "Import des profils d'archivage",
            ),
            Self::Context => (
                "json",
                "contexts",
                "Les contextes applicatifs ont bien été importés",
                "Import des contextes applicatifs",
            ),
            Self::Agencies => (
                "csv",
                "agencies",
                "Les services agents ont bien été importés",
                "Import des services agents",
            ),
            Self::Ontology => (
                "json",
                "ontologies",
                "Les ontologies ont bien été importées",
                "Import des ontologies",
            ),
            Self::Griffins => (
                "json",
                "griffins",
                "Les griffons ont bien été importés",
                "Import des griffons",
            ),
            Self::Scenarios => (
                "json",
                "scenarios",
                "Les scénarios de preservation ont bien été importés",
                "Import des scénarios de preservation",
            ),
        };
        ImportSettings {
            referential: self,
            extensions: vec![extension.to_string()],
            upload_api: upload_api.to_string(),
            success_message: success_message.to_string(),
            error_message: IMPORT_ERROR.to_string(),
            breadcrumb_name: breadcrumb.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreadcrumbItem {
    pub label: String,
    pub router_link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSettings {
    pub referential: ReferentialType,
    pub extensions: Vec<String>,
    pub upload_api: String,
    pub success_message: String,
    pub error_message: String,
    pub breadcrumb_name: String,
}

impl ImportSettings {
    pub fn accepts(&self, file_name: &str) -> bool {
        let Some((_, ext)) = file_name.rsplit_once('.') else {
            return false;
        };
        self.extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext))
    }

    pub fn breadcrumb(&self) -> Vec<BreadcrumbItem> {
        vec![
            BreadcrumbItem {
                label: "Administration".to_string(),
                router_link: String::new(),
            },
            BreadcrumbItem {
                label: self.breadcrumb_name.clone(),
                router_link: format!("admin/import/{}", self.referential.route_param()),
            },
        ]
    }

    /// Route of another page (`search`, `import`, …) for the same referential.
    pub fn navigation_path(&self, action: &str) -> String {
        format!("admin/{}/{}", action, self.referential.route_param())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportRoute {
    Import(ImportSettings),
    Redirect(&'static str),
}

/// Resolves the `referentialType` route parameter of the import page.
pub fn resolve_route(param: &str) -> ImportRoute {
    match ReferentialType::from_route_param(param) {
        Some(kind) => ImportRoute::Import(kind.settings()),
        None => ImportRoute::Redirect(FALLBACK_ROUTE),
    }
}

/// Referentials offered in the selector for the current user.
pub fn available_types(is_tenant_admin: bool) -> Vec<ReferentialType> {
    ReferentialType::ALL
        .into_iter()
        .filter(|kind| is_tenant_admin || !kind.requires_tenant_admin())
        .collect()
}
