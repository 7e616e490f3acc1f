// urlscrub/src/ui/messages.rs
//! Localized texts for the per-URL report.

use clap::ValueEnum;

/// Languages the report can be printed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Language {
    #[default]
    En,
    De,
}

/// Every user-facing string of the per-URL report.
#[derive(Debug)]
pub struct Messages {
    pub no_links_found: &'static str,
    /// Contains a `{count}` placeholder.
    pub urls_detected_template: &'static str,
    pub url_heading: &'static str,
    pub cleaned_link: &'static str,
    pub applied_rules: &'static str,
    pub removed_parameters: &'static str,
    pub none: &'static str,
    pub already_clean: &'static str,
    pub exception: &'static str,
    pub summary_header: &'static str,
    pub summary_rule: &'static str,
    pub summary_occurrences: &'static str,
}

static EN: Messages = Messages {
    no_links_found: "Failed to find any links.",
    urls_detected_template: "Detected {count} URL(s):",
    url_heading: "URL",
    cleaned_link: "Cleaned link",
    applied_rules: "Applied rules",
    removed_parameters: "Removed parameters",
    none: "None",
    already_clean: "URL was already clean?",
    exception: "Left unchanged by exception rule",
    summary_header: "Cleaning summary",
    summary_rule: "Rule",
    summary_occurrences: "URLs",
};

static DE: Messages = Messages {
    no_links_found: "Keine Links gefunden.",
    urls_detected_template: "{count} URL(s) gefunden:",
    url_heading: "URL",
    cleaned_link: "Bereinigter Link",
    applied_rules: "Angewendete Regeln",
    removed_parameters: "Entfernte Parameter",
    none: "Keine",
    already_clean: "URL war bereits sauber?",
    exception: "Durch Ausnahmeregel unverändert",
    summary_header: "Zusammenfassung",
    summary_rule: "Regel",
    summary_occurrences: "URLs",
};

impl Language {
    pub fn messages(self) -> &'static Messages {
        match self {
            Language::En => &EN,
            Language::De => &DE,
        }
    }
}

impl Messages {
    pub fn urls_detected(&self, count: usize) -> String {
        self.urls_detected_template.replace("{count}", &count.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detected_count_is_filled_in() {
        assert_eq!(Language::En.messages().urls_detected(2), "Detected 2 URL(s):");
        assert_eq!(Language::De.messages().urls_detected(1), "1 URL(s) gefunden:");
    }
}
