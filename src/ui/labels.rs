use crate::data::Language;

/// Every piece of text the countdown screen shows.
pub struct Labels {
    pub title: &'static str,
    pub birth_date: &'static str,
    pub remember: &'static str,
    pub clear: &'static str,
    pub retirement_date: &'static str,
    pub retirement_reached: &'static str,
    pub days: &'static str,
    pub hours: &'static str,
    pub minutes: &'static str,
    pub seconds: &'static str,
    pub info: &'static str,
    pub info_text: &'static str,
    pub hints: &'static str,
}

static DE: Labels = Labels {
    title: "Pensions Countdown",
    birth_date: "Geburtsdatum (JJJJ-MM-TT)",
    remember: "Geburtsdatum merken",
    clear: "Datum löschen",
    retirement_date: "Pensionsdatum",
    retirement_reached: "Pensionsdatum erreicht",
    days: "Tage",
    hours: "Stunden",
    minutes: "Minuten",
    seconds: "Sekunden",
    info: "Info",
    info_text: "Alle Daten werden ausschließlich auf diesem Rechner gespeichert und lokal \
                berechnet. Es werden keine Daten über das Internet übertragen. Das \
                Pensionsdatum wird gemäß österreichischer Regelung berechnet: Erster Tag \
                des Monats nach dem 65. Geburtstag.",
    hints: "Tab=weiter  Leertaste=auswählen  i=Info  Esc=beenden",
};

static EN: Labels = Labels {
    title: "Pension Countdown",
    birth_date: "Date of birth (YYYY-MM-DD)",
    remember: "Remember date of birth",
    clear: "Clear date",
    retirement_date: "Retirement date",
    retirement_reached: "Retirement date reached",
    days: "Days",
    hours: "Hours",
    minutes: "Minutes",
    seconds: "Seconds",
    info: "Info",
    info_text: "All data is stored only on this computer and computed locally. No data \
                is transmitted over the internet. The retirement date follows the \
                Austrian rule: first day of the month after the 65th birthday.",
    hints: "Tab=next  Space=select  i=info  Esc=quit",
};

pub fn labels_for(language: Language) -> &'static Labels {
    match language {
        Language::De => &DE,
        Language::En => &EN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_follow_language() {
        assert_eq!(labels_for(Language::De).days, "Tage");
        assert_eq!(labels_for(Language::En).days, "Days");
    }

    #[test]
    fn test_info_text_states_rule_and_privacy() {
        for lang in [Language::De, Language::En] {
            let text = labels_for(lang).info_text;
            assert!(text.contains("65"));
            assert!(text.contains("Internet") || text.contains("internet"));
        }
    }
}
