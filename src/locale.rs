//! Interface copy for the two supported locales.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Locale {
    En,
    Es,
}

impl Locale {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "en" => Some(Self::En),
            "es" => Some(Self::Es),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::En => Self::Es,
            Self::Es => Self::En,
        }
    }

    /// Label for the switch button: the locale it switches to.
    pub fn switch_label(self) -> &'static str {
        match self.toggled() {
            Self::En => "EN",
            Self::Es => "ES",
        }
    }

    pub fn resume_url(self) -> &'static str {
        match self {
            Self::En => "/resume-en.pdf",
            Self::Es => "/resume-es.pdf",
        }
    }

    fn table(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::En => EN,
            Self::Es => ES,
        }
    }

    /// Looks up `key`, falling back to English and then to the key itself.
    pub fn t<'a>(self, key: &'a str) -> &'a str {
        match lookup(self.table(), key).or_else(|| lookup(EN, key)) {
            Some(value) => value,
            None => key,
        }
    }
}

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, value)| *value)
}

const EN: &[(&str, &str)] = &[
    ("navigation.about", "About"),
    ("navigation.projects", "Projects"),
    ("navigation.contact", "Contact"),
    ("hero.name", "Alejandro Repetto"),
    ("hero.title", "Systems Engineering Student"),
    (
        "hero.description",
        "I build intelligent management systems, automation tools, and AI/ML applications that save people time and simplify complex processes.",
    ),
    ("hero.cta.projects", "See Projects"),
    ("hero.cta.resume", "Download Resume"),
    ("hero.scroll", "Learn more"),
    ("about.title", "About"),
    (
        "about.body",
        "Systems engineering student focused on turning messy operational workflows into dependable software, from data pipelines to small internal tools.",
    ),
    ("projects.title", "Projects"),
    ("projects.inventory", "Inventory management system with demand forecasting."),
    ("projects.automation", "Document automation toolkit for administrative offices."),
    ("projects.vision", "Computer vision prototype for quality inspection."),
    ("contact.title", "Get in touch"),
    ("contact.name", "Name"),
    ("contact.email", "Email"),
    ("contact.subject", "Subject"),
    ("contact.message", "Message"),
    ("contact.send", "Send message"),
    ("contact.sending", "Sending…"),
    ("contact.failed", "Something went wrong. Please try again later."),
];

const ES: &[(&str, &str)] = &[
    ("navigation.about", "Sobre mí"),
    ("navigation.projects", "Proyectos"),
    ("navigation.contact", "Contacto"),
    ("hero.title", "Estudiante de Ingeniería de Sistemas"),
    (
        "hero.description",
        "Construyo sistemas de gestión inteligentes, herramientas de automatización y aplicaciones de IA/ML que ahorran tiempo y simplifican procesos complejos.",
    ),
    ("hero.cta.projects", "Ver proyectos"),
    ("hero.cta.resume", "Descargar CV"),
    ("hero.scroll", "Saber más"),
    ("about.title", "Sobre mí"),
    (
        "about.body",
        "Estudiante de ingeniería de sistemas enfocado en convertir flujos operativos desordenados en software confiable, desde pipelines de datos hasta pequeñas herramientas internas.",
    ),
    ("projects.title", "Proyectos"),
    ("projects.inventory", "Sistema de inventario con pronóstico de demanda."),
    ("projects.automation", "Kit de automatización documental para oficinas administrativas."),
    ("projects.vision", "Prototipo de visión por computadora para inspección de calidad."),
    ("contact.title", "Contacto"),
    ("contact.name", "Nombre"),
    ("contact.email", "Correo electrónico"),
    ("contact.subject", "Asunto"),
    ("contact.message", "Mensaje"),
    ("contact.send", "Enviar mensaje"),
    ("contact.sending", "Enviando…"),
    ("contact.failed", "Algo salió mal. Por favor, inténtalo de nuevo más tarde."),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_and_toggle() {
        assert_eq!(Locale::from_str("es"), Some(Locale::Es));
        assert_eq!(Locale::from_str("en"), Some(Locale::En));
        assert_eq!(Locale::from_str("fr"), None);
        assert_eq!(Locale::from_str("EN"), None);
        for locale in [Locale::En, Locale::Es] {
            assert_eq!(Locale::from_str(locale.as_str()), Some(locale));
        }
        assert_eq!(Locale::En.toggled(), Locale::Es);
        assert_eq!(Locale::Es.toggled().toggled(), Locale::Es);
        assert_eq!(Locale::En.switch_label(), "ES");
    }

    #[test]
    fn spanish_falls_back_to_english_copy() {
        assert!(lookup(ES, "hero.name").is_none());
        assert_eq!(Locale::Es.t("hero.name"), Locale::En.t("hero.name"));
        assert_eq!(Locale::Es.t("navigation.about"), "Sobre mí");
    }

    #[test]
    fn unknown_keys_pass_through() {
        assert_eq!(Locale::En.t("footer.missing"), "footer.missing");
        assert_eq!(Locale::Es.t("footer.missing"), "footer.missing");
    }

    #[test]
    fn spanish_table_has_no_keys_english_lacks() {
        for (key, _) in ES {
            assert!(lookup(EN, key).is_some(), "{key} missing from English");
        }
    }
}
