use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AcademicYear {
    #[serde(rename = "1")]
    First,
    #[serde(rename = "2")]
    Second,
    #[serde(rename = "3")]
    Third,
    #[serde(rename = "4")]
    Fourth,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Semester {
    #[serde(rename = "1")]
    First,
    #[serde(rename = "2")]
    Second,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum AlStream {
    #[default]
    #[serde(rename = "")]
    Unspecified,
    #[serde(rename = "Physical Science")]
    PhysicalScience,
    #[serde(rename = "Biological Science")]
    BiologicalScience,
    Commerce,
    Arts,
    Technology,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Subject {
    Programming,
    Mathematics,
    Networking,
    Design,
    Research,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Excitement {
    Coding,
    #[serde(rename = "Analyzing Data")]
    AnalyzingData,
    #[serde(rename = "Designing Interfaces & Media")]
    DesigningInterfacesAndMedia,
    #[serde(rename = "Managing IT Systems")]
    ManagingItSystems,
    #[serde(rename = "Securing Systems & Networks")]
    SecuringSystemsAndNetworks,
    #[serde(rename = "Building with Hardware/Embedded")]
    BuildingWithHardware,
    #[serde(rename = "Doing Research")]
    DoingResearch,
}

impl Excitement {
    pub fn label(&self) -> &'static str {
        match self {
            Excitement::Coding => "Coding",
            Excitement::AnalyzingData => "Analyzing Data",
            Excitement::DesigningInterfacesAndMedia => "Designing Interfaces & Media",
            Excitement::ManagingItSystems => "Managing IT Systems",
            Excitement::SecuringSystemsAndNetworks => "Securing Systems & Networks",
            Excitement::BuildingWithHardware => "Building with Hardware/Embedded",
            Excitement::DoingResearch => "Doing Research",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum WorkStyle {
    Individual,
    Team,
}

/// Shared Low/Medium/High scale for patience, interest and comfort questions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Level {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CareerGoal {
    #[serde(rename = "Software Engineer")]
    SoftwareEngineer,
    #[serde(rename = "Full Stack Developer")]
    FullStackDeveloper,
    #[serde(rename = "Mobile Developer")]
    MobileDeveloper,
    #[serde(rename = "Data Scientist")]
    DataScientist,
    #[serde(rename = "Data Engineer")]
    DataEngineer,
    #[serde(rename = "ML/AI Engineer")]
    MlAiEngineer,
    #[serde(rename = "Network Engineer")]
    NetworkEngineer,
    #[serde(rename = "DevOps/Cloud Engineer")]
    DevOpsCloudEngineer,
    #[serde(rename = "Cyber Security Analyst")]
    CyberSecurityAnalyst,
    #[serde(rename = "Business Analyst")]
    BusinessAnalyst,
    #[serde(rename = "Systems Analyst")]
    SystemsAnalyst,
    #[serde(rename = "Product Owner")]
    ProductOwner,
    #[serde(rename = "UI/UX Designer")]
    UiUxDesigner,
    #[serde(rename = "Game Developer")]
    GameDeveloper,
    #[serde(rename = "Research/Academia")]
    ResearchAcademia,
}

impl CareerGoal {
    /// The label shown to students; the scorer keys its bonuses off this text.
    pub fn label(&self) -> &'static str {
        match self {
            CareerGoal::SoftwareEngineer => "Software Engineer",
            CareerGoal::FullStackDeveloper => "Full Stack Developer",
            CareerGoal::MobileDeveloper => "Mobile Developer",
            CareerGoal::DataScientist => "Data Scientist",
            CareerGoal::DataEngineer => "Data Engineer",
            CareerGoal::MlAiEngineer => "ML/AI Engineer",
            CareerGoal::NetworkEngineer => "Network Engineer",
            CareerGoal::DevOpsCloudEngineer => "DevOps/Cloud Engineer",
            CareerGoal::CyberSecurityAnalyst => "Cyber Security Analyst",
            CareerGoal::BusinessAnalyst => "Business Analyst",
            CareerGoal::SystemsAnalyst => "Systems Analyst",
            CareerGoal::ProductOwner => "Product Owner",
            CareerGoal::UiUxDesigner => "UI/UX Designer",
            CareerGoal::GameDeveloper => "Game Developer",
            CareerGoal::ResearchAcademia => "Research/Academia",
        }
    }
}

/// A validated student self-assessment. Built by `recommendation::validation`;
/// stored verbatim (camelCase JSON) next to the recommendation it produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub current_year: AcademicYear,
    pub current_semester: Semester,
    pub cgpa: Option<f64>,
    pub al_stream: AlStream,
    pub has_physics_and_combined_maths: bool,
    pub subjects: Vec<Subject>,
    pub excitement: Excitement,
    pub programming_skill: u8,
    pub math_skill: u8,
    pub cyber_skill: u8,
    pub uiux_skill: u8,
    pub research_skill: u8,
    pub motivation: u8,
    pub languages: Vec<String>,
    pub work_style: WorkStyle,
    pub debug_patience: Level,
    pub hardware_interest: Level,
    pub design_creativity: Level,
    pub data_handling_comfort: Level,
    pub security_mindset: Level,
    pub wants_research_path: bool,
    pub career_goals: Vec<CareerGoal>,
    pub additional: String,
    pub consent_to_share_with_experts: bool,
}
