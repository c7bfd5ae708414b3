//! Common laws module - static table of frequently consulted laws
//!
//! The table is compiled into the binary and never mutated, so it can be
//! read from any number of concurrent callers. Lookups re-scan it; there is
//! no index.

use serde::Serialize;
use std::fmt;

/// Constitución Española
pub const CONSTITUCION: &str = "BOE-A-1978-31229";
/// Ley Orgánica 3/2018 de Protección de Datos
pub const LOPD: &str = "BOE-A-2018-16673";
/// Ley 39/2015 del Procedimiento Administrativo Común
pub const LEY_39_2015: &str = "BOE-A-2015-10565";
/// Ley 40/2015 de Régimen Jurídico del Sector Público
pub const LEY_40_2015: &str = "BOE-A-2015-10566";
/// Código Civil
pub const CODIGO_CIVIL: &str = "BOE-A-1889-4763";
/// Código Penal
pub const CODIGO_PENAL: &str = "BOE-A-1995-25444";
/// Estatuto de los Trabajadores
pub const ESTATUTO_TRABAJADORES: &str = "BOE-A-2015-11430";
/// Ley 9/2017 de Contratos del Sector Público
pub const LEY_CONTRATOS: &str = "BOE-A-2017-12902";

/// Area of law a table entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LawCategory {
    /// Constitution and fundamental norms
    Fundamental,
    /// Organic laws
    Organica,
    /// Administrative procedure
    Procedimiento,
    /// Civil law
    Civil,
    /// Labour law
    Laboral,
    /// Commercial law
    Mercantil,
    /// Public procurement
    Contratacion,
    /// Procedural law
    Procesal,
    /// Intellectual property
    PropiedadIntelectual,
    /// Consumer protection
    Consumo,
    /// Transparency and good governance
    Transparencia,
    /// Equality
    Igualdad,
    /// Education
    Educacion,
    /// Health
    Sanidad,
}

impl LawCategory {
    /// Every category, in display order
    pub const ALL: [LawCategory; 14] = [
        Self::Fundamental,
        Self::Organica,
        Self::Procedimiento,
        Self::Civil,
        Self::Laboral,
        Self::Mercantil,
        Self::Contratacion,
        Self::Procesal,
        Self::PropiedadIntelectual,
        Self::Consumo,
        Self::Transparencia,
        Self::Igualdad,
        Self::Educacion,
        Self::Sanidad,
    ];

    /// Key used in tool arguments
    pub fn key(&self) -> &'static str {
        match self {
            Self::Fundamental => "fundamental",
            Self::Organica => "organica",
            Self::Procedimiento => "procedimiento",
            Self::Civil => "civil",
            Self::Laboral => "laboral",
            Self::Mercantil => "mercantil",
            Self::Contratacion => "contratacion",
            Self::Procesal => "procesal",
            Self::PropiedadIntelectual => "propiedad_intelectual",
            Self::Consumo => "consumo",
            Self::Transparencia => "transparencia",
            Self::Igualdad => "igualdad",
            Self::Educacion => "educacion",
            Self::Sanidad => "sanidad",
        }
    }

    /// Heading shown to users
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Fundamental => "Normas fundamentales y Constitución",
            Self::Organica => "Leyes Orgánicas",
            Self::Procedimiento => "Procedimiento Administrativo",
            Self::Civil => "Derecho Civil",
            Self::Laboral => "Derecho Laboral",
            Self::Mercantil => "Derecho Mercantil",
            Self::Contratacion => "Contratación Pública",
            Self::Procesal => "Derecho Procesal",
            Self::PropiedadIntelectual => "Propiedad Intelectual",
            Self::Consumo => "Consumo y Protección al Consumidor",
            Self::Transparencia => "Transparencia y Buen Gobierno",
            Self::Igualdad => "Igualdad",
            Self::Educacion => "Educación",
            Self::Sanidad => "Sanidad",
        }
    }

    /// Parse a category key
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl fmt::Display for LawCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A well-known law and its canonical upstream identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LawReference {
    /// Upstream identifier, e.g. `BOE-A-1978-31229`
    pub identifier: &'static str,
    /// Display name
    pub name: &'static str,
    /// Other names the law is known by
    pub aliases: &'static [&'static str],
    /// Publication date (`YYYY-MM-DD`)
    pub date: &'static str,
    /// Area of law
    pub category: LawCategory,
    /// One-line description
    pub description: &'static str,
}

impl LawReference {
    /// Publication year
    pub fn year(&self) -> i32 {
        self.date
            .split('-')
            .next()
            .and_then(|y| y.parse().ok())
            .unwrap_or_default()
    }

    /// Case-insensitive substring match over name and aliases
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        self.name.to_lowercase().contains(&keyword)
            || self
                .aliases
                .iter()
                .any(|alias| alias.to_lowercase().contains(&keyword))
    }
}

static COMMON_LAWS: &[LawReference] = &[
    LawReference {
        identifier: CONSTITUCION,
        name: "Constitución Española",
        aliases: &["CE", "Constitución", "Carta Magna"],
        date: "1978-12-29",
        category: LawCategory::Fundamental,
        description: "Norma suprema del ordenamiento jurídico español",
    },
    LawReference {
        identifier: "BOE-A-1985-5392",
        name: "Ley Orgánica 6/1985 del Poder Judicial (LOPJ)",
        aliases: &["LOPJ", "Poder Judicial"],
        date: "1985-07-02",
        category: LawCategory::Organica,
        description: "Organización y funcionamiento del Poder Judicial",
    },
    LawReference {
        identifier: LOPD,
        name: "Ley Orgánica 3/2018 de Protección de Datos (LOPDGDD)",
        aliases: &["LOPD", "LOPDGDD", "Protección de datos personales", "Derechos digitales"],
        date: "2018-12-06",
        category: LawCategory::Organica,
        description: "Protección de datos personales y garantía de derechos digitales",
    },
    LawReference {
        identifier: CODIGO_PENAL,
        name: "Ley Orgánica 10/1995 del Código Penal",
        aliases: &["CP", "Código Penal", "Derecho penal"],
        date: "1995-11-24",
        category: LawCategory::Organica,
        description: "Código Penal español",
    },
    LawReference {
        identifier: LEY_39_2015,
        name: "Ley 39/2015 del Procedimiento Administrativo Común",
        aliases: &["LPAC", "Procedimiento administrativo"],
        date: "2015-10-02",
        category: LawCategory::Procedimiento,
        description: "Procedimiento administrativo común de las Administraciones Públicas",
    },
    LawReference {
        identifier: LEY_40_2015,
        name: "Ley 40/2015 de Régimen Jurídico del Sector Público",
        aliases: &["LRJSP", "Régimen jurídico"],
        date: "2015-10-02",
        category: LawCategory::Procedimiento,
        description: "Régimen jurídico del sector público",
    },
    LawReference {
        identifier: CODIGO_CIVIL,
        name: "Real Decreto de 24 de julio de 1889 - Código Civil",
        aliases: &["CC", "Código Civil", "Derecho civil"],
        date: "1889-07-25",
        category: LawCategory::Civil,
        description: "Código Civil español",
    },
    LawReference {
        identifier: "BOE-A-2000-323",
        name: "Ley 1/2000 de Enjuiciamiento Civil",
        aliases: &["LEC", "Enjuiciamiento civil"],
        date: "2000-01-08",
        category: LawCategory::Civil,
        description: "Ley de Enjuiciamiento Civil",
    },
    LawReference {
        identifier: ESTATUTO_TRABAJADORES,
        name: "Real Decreto Legislativo 2/2015 - Estatuto de los Trabajadores",
        aliases: &["ET", "Estatuto de los Trabajadores", "Legislación laboral"],
        date: "2015-10-24",
        category: LawCategory::Laboral,
        description: "Texto refundido del Estatuto de los Trabajadores",
    },
    LawReference {
        identifier: "BOE-A-2015-11724",
        name: "Real Decreto Legislativo 5/2015 - Estatuto Básico del Empleado Público",
        aliases: &["EBEP", "Empleo público", "Función pública"],
        date: "2015-10-31",
        category: LawCategory::Laboral,
        description: "Texto refundido del Estatuto Básico del Empleado Público",
    },
    LawReference {
        identifier: "BOE-A-2010-10544",
        name: "Real Decreto Legislativo 1/2010 - Ley de Sociedades de Capital",
        aliases: &["LSC", "Sociedades de capital", "Derecho societario"],
        date: "2010-07-03",
        category: LawCategory::Mercantil,
        description: "Texto refundido de la Ley de Sociedades de Capital",
    },
    LawReference {
        identifier: "BOE-A-1885-6627",
        name: "Real Decreto de 22 de agosto de 1885 - Código de Comercio",
        aliases: &["CCom", "Código de Comercio", "Derecho mercantil"],
        date: "1885-10-16",
        category: LawCategory::Mercantil,
        description: "Código de Comercio",
    },
    LawReference {
        identifier: LEY_CONTRATOS,
        name: "Ley 9/2017 de Contratos del Sector Público",
        aliases: &["LCSP", "Contratación pública", "Contratos públicos"],
        date: "2017-11-09",
        category: LawCategory::Contratacion,
        description: "Contratos del Sector Público",
    },
    LawReference {
        identifier: "BOE-A-1998-16718",
        name: "Ley 29/1998 de la Jurisdicción Contencioso-administrativa",
        aliases: &["LJCA", "Contencioso-administrativo"],
        date: "1998-07-14",
        category: LawCategory::Procesal,
        description: "Reguladora de la Jurisdicción Contencioso-administrativa",
    },
    LawReference {
        identifier: "BOE-A-1996-8930",
        name: "Real Decreto Legislativo 1/1996 - Ley de Propiedad Intelectual",
        aliases: &["LPI", "Propiedad intelectual", "Derechos de autor"],
        date: "1996-04-22",
        category: LawCategory::PropiedadIntelectual,
        description: "Texto refundido de la Ley de Propiedad Intelectual",
    },
    LawReference {
        identifier: "BOE-A-2007-20555",
        name: "Real Decreto Legislativo 1/2007 - Ley General de Consumidores",
        aliases: &["TRLGDCU", "Consumidores y usuarios"],
        date: "2007-11-30",
        category: LawCategory::Consumo,
        description: "Texto refundido de la Ley General para la Defensa de los Consumidores",
    },
    LawReference {
        identifier: "BOE-A-2013-12887",
        name: "Ley 19/2013 de Transparencia y Buen Gobierno",
        aliases: &["LTBG", "Ley de Transparencia", "Acceso a la información pública"],
        date: "2013-12-10",
        category: LawCategory::Transparencia,
        description: "Transparencia, acceso a la información pública y buen gobierno",
    },
    LawReference {
        identifier: "BOE-A-2007-6115",
        name: "Ley Orgánica 3/2007 para la Igualdad Efectiva",
        aliases: &["LOIEMH", "Ley de Igualdad", "Igualdad laboral"],
        date: "2007-03-23",
        category: LawCategory::Igualdad,
        description: "Igualdad efectiva de mujeres y hombres",
    },
    LawReference {
        identifier: "BOE-A-2020-17264",
        name: "Ley Orgánica 3/2020 de Educación (LOMLOE)",
        aliases: &["LOMLOE", "Ley Celaá", "Ley de Educación"],
        date: "2020-12-30",
        category: LawCategory::Educacion,
        description: "Ley Orgánica de modificación de la LOE",
    },
    LawReference {
        identifier: "BOE-A-1986-10499",
        name: "Ley 14/1986 General de Sanidad",
        aliases: &["LGS", "Sanidad pública"],
        date: "1986-04-29",
        category: LawCategory::Sanidad,
        description: "Ley General de Sanidad",
    },
];

/// The whole table, in declaration order
pub fn all() -> &'static [LawReference] {
    COMMON_LAWS
}

/// Look up an entry by its upstream identifier
pub fn find(identifier: &str) -> Option<&'static LawReference> {
    COMMON_LAWS.iter().find(|law| law.identifier == identifier)
}

/// Entries whose name or an alias contains `keyword`, ignoring case
///
/// The returned iterator is lazy; clone it to scan again.
pub fn search_by_keyword(
    keyword: &str,
) -> impl Iterator<Item = &'static LawReference> + Clone + '_ {
    COMMON_LAWS
        .iter()
        .filter(move |law| law.matches_keyword(keyword))
}

/// Entries of one category
pub fn by_category(category: LawCategory) -> impl Iterator<Item = &'static LawReference> + Clone {
    COMMON_LAWS
        .iter()
        .filter(move |law| law.category == category)
}

/// Entries published in `current_year - years_back` or later, newest first
pub fn recent(years_back: u32, current_year: i32) -> Vec<&'static LawReference> {
    let min_year = current_year - years_back as i32;
    let mut laws: Vec<_> = COMMON_LAWS
        .iter()
        .filter(|law| law.year() >= min_year)
        .collect();
    laws.sort_by(|a, b| b.date.cmp(a.date));
    laws
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::LawId;

    #[test]
    fn test_every_identifier_is_well_formed() {
        for law in all() {
            assert!(LawId::is_valid(law.identifier), "{}", law.identifier);
        }
        assert_eq!(all().len(), 20);
    }

    #[test]
    fn test_constants_resolve() {
        for id in [
            CONSTITUCION,
            LOPD,
            LEY_39_2015,
            LEY_40_2015,
            CODIGO_CIVIL,
            CODIGO_PENAL,
            ESTATUTO_TRABAJADORES,
            LEY_CONTRATOS,
        ] {
            assert!(find(id).is_some(), "{}", id);
        }
        assert_eq!(find(CONSTITUCION).unwrap().name, "Constitución Española");
        assert!(find("BOE-A-2099-1").is_none());
    }

    #[test]
    fn test_keyword_search_matches_name_and_aliases() {
        let found: Vec<_> = search_by_keyword("laboral").collect();
        assert!(!found.is_empty());
        for law in &found {
            assert!(law.matches_keyword("LABORAL"));
        }
        assert!(found.iter().any(|l| l.identifier == ESTATUTO_TRABAJADORES));

        // Description text is not searched
        assert_eq!(search_by_keyword("norma suprema").count(), 0);
    }

    #[test]
    fn test_keyword_search_is_restartable() {
        let search = search_by_keyword("código");
        let first: Vec<_> = search.clone().map(|l| l.identifier).collect();
        let second: Vec<_> = search.map(|l| l.identifier).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_by_category() {
        assert_eq!(by_category(LawCategory::Organica).count(), 3);
        assert_eq!(
            LawCategory::from_key("propiedad_intelectual"),
            Some(LawCategory::PropiedadIntelectual)
        );
        assert_eq!(LawCategory::from_key("penal"), None);
    }

    #[test]
    fn test_recent_is_newest_first() {
        let laws = recent(10, 2024);
        let ids: Vec<_> = laws.iter().map(|l| l.identifier).collect();
        assert_eq!(ids, vec!["BOE-A-2020-17264", LOPD, LEY_CONTRATOS, "BOE-A-2015-11724", ESTATUTO_TRABAJADORES, LEY_39_2015, LEY_40_2015]);
        assert!(recent(1, 2024).is_empty());
    }
}
