use serde::{Deserialize, Serialize};

/// Interface languages supported by the platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Hi,
    Ta,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::En, Locale::Hi, Locale::Ta];

    /// Parse a language code. Unrecognized codes fall back to English.
    pub fn parse(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "hi" => Self::Hi,
            "ta" => Self::Ta,
            _ => Self::En,
        }
    }

    /// Two-letter code used in backend query parameters.
    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Hi => "hi",
            Self::Ta => "ta",
        }
    }

    /// Endonym shown in the language selector.
    pub fn native_name(&self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Hi => "हिंदी",
            Self::Ta => "தமிழ்",
        }
    }

    /// Resolve the full string table for this locale.
    pub fn resolve(&self) -> &'static StringTable {
        match self {
            Self::En => &EN,
            Self::Hi => &HI,
            Self::Ta => &TA,
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Every string the presentation layer can reference. One field per key, so
/// a locale cannot ship a partial table.
#[derive(Debug, Clone, Copy)]
pub struct StringTable {
    pub app_title: &'static str,
    pub upload_section: &'static str,
    pub dashboard_section: &'static str,
    pub upload_button: &'static str,
    pub analyze_button: &'static str,
    pub refresh_button: &'static str,
    pub download_report: &'static str,
    pub loading: &'static str,
    pub uploading: &'static str,
    pub no_data: &'static str,
    pub score_label: &'static str,
    pub risk_label: &'static str,
    pub assessment_label: &'static str,
    pub recommendations_label: &'static str,
    pub no_recommendations: &'static str,
    pub language_notice: &'static str,
    pub error_upload: &'static str,
    pub error_no_data: &'static str,
    pub error_analysis: &'static str,
}

impl StringTable {
    /// Key/value pairs in a stable order, for listings and JSON output.
    pub fn entries(&self) -> [(&'static str, &'static str); 19] {
        [
            ("app_title", self.app_title),
            ("upload_section", self.upload_section),
            ("dashboard_section", self.dashboard_section),
            ("upload_button", self.upload_button),
            ("analyze_button", self.analyze_button),
            ("refresh_button", self.refresh_button),
            ("download_report", self.download_report),
            ("loading", self.loading),
            ("uploading", self.uploading),
            ("no_data", self.no_data),
            ("score_label", self.score_label),
            ("risk_label", self.risk_label),
            ("assessment_label", self.assessment_label),
            ("recommendations_label", self.recommendations_label),
            ("no_recommendations", self.no_recommendations),
            ("language_notice", self.language_notice),
            ("error_upload", self.error_upload),
            ("error_no_data", self.error_no_data),
            ("error_analysis", self.error_analysis),
        ]
    }
}

static EN: StringTable = StringTable {
    app_title: "SME Financial Health Platform",
    upload_section: "Upload Financial Documents",
    dashboard_section: "Financial Dashboard",
    upload_button: "Upload Data",
    analyze_button: "Load Analysis",
    refresh_button: "Refresh Analysis",
    download_report: "Download Report",
    loading: "Loading Analysis...",
    uploading: "Uploading...",
    no_data: "No analysis data available.",
    score_label: "Financial Health Score",
    risk_label: "Risk Level",
    assessment_label: "Assessment",
    recommendations_label: "Recommendations",
    no_recommendations: "No specific recommendations available",
    language_notice: "Select language before loading analysis for results in your preferred language",
    error_upload: "Upload failed",
    error_no_data: "No data found. Please upload a file first.",
    error_analysis: "Analysis failed",
};

static HI: StringTable = StringTable {
    app_title: "लघु एवं मध्यम उद्यम वित्तीय स्वास्थ्य मंच",
    upload_section: "वित्तीय दस्तावेज़ अपलोड करें",
    dashboard_section: "वित्तीय डैशबोर्ड",
    upload_button: "डेटा अपलोड करें",
    analyze_button: "विश्लेषण लोड करें",
    refresh_button: "विश्लेषण रीफ्रेश करें",
    download_report: "रिपोर्ट डाउनलोड करें",
    loading: "विश्लेषण लोड हो रहा है...",
    uploading: "अपलोड हो रहा है...",
    no_data: "कोई विश्लेषण डेटा उपलब्ध नहीं है।",
    score_label: "वित्तीय स्वास्थ्य स्कोर",
    risk_label: "जोखिम स्तर",
    assessment_label: "मूल्यांकन",
    recommendations_label: "सिफारिशें",
    no_recommendations: "कोई विशिष्ट सिफारिशें उपलब्ध नहीं हैं",
    language_notice: "अपनी पसंदीदा भाषा में परिणाम के लिए विश्लेषण लोड करने से पहले भाषा चुनें",
    error_upload: "अपलोड विफल",
    error_no_data: "कोई डेटा नहीं मिला। कृपया पहले एक फ़ाइल अपलोड करें।",
    error_analysis: "विश्लेषण विफल",
};

static TA: StringTable = StringTable {
    app_title: "சிறு மற்றும் நடுத்தர நிறுவன நிதி சுகாதார தளம்",
    upload_section: "நிதி ஆவணங்களை பதிவேற்றவும்",
    dashboard_section: "நிதி டாஷ்போர்டு",
    upload_button: "தரவை பதிவேற்றவும்",
    analyze_button: "பகுப்பாய்வை ஏற்றவும்",
    refresh_button: "பகுப்பாய்வை புதுப்பிக்கவும்",
    download_report: "அறிக்கையை பதிவிறக்கவும்",
    loading: "பகுப்பாய்வு ஏற்றப்படுகிறது...",
    uploading: "பதிவேற்றப்படுகிறது...",
    no_data: "பகுப்பாய்வு தரவு இல்லை.",
    score_label: "நிதி சுகாதார மதிப்பெண்",
    risk_label: "ஆபத்து நிலை",
    assessment_label: "மதிப்பீடு",
    recommendations_label: "பரிந்துரைகள்",
    no_recommendations: "குறிப்பிட்ட பரிந்துரைகள் எதுவும் இல்லை",
    language_notice: "உங்கள் விருப்பமான மொழியில் முடிவுகளுக்கு பகுப்பாய்வை ஏற்றுவதற்கு முன் மொழியைத் தேர்ந்தெடுக்கவும்",
    error_upload: "பதிவேற்றம் தோல்வியடைந்தது",
    error_no_data: "தரவு எதுவும் கிடைக்கவில்லை. முதலில் ஒரு கோப்பை பதிவேற்றவும்.",
    error_analysis: "பகுப்பாய்வு தோல்வியடைந்தது",
};
