//! Lake name and identifier lookup

use std::collections::{BTreeMap, BTreeSet};

/// Name as written in the water-quality data -> lake id
const BUILTIN_ALIASES: [(&str, &str); 14] = [
    ("Hussain Sagar", "hussain-sagar"),
    ("Osman Sagar (Gandipet)", "osman-sagar"),
    ("Himayat Sagar", "himayat-sagar"),
    ("Shamirpet", "shamirpet"),
    ("Shamirpet Lake", "shamirpet"),
    ("Durgam Cheruvu", "durgam-cheruvu"),
    ("Secret Lake", "durgam-cheruvu"),
    ("Khajaguda Lake", "khajaguda"),
    ("Lotus Pond", "lotus-pond"),
    ("Noor Mohammed Kunta", "noor-mohammed-kunta"),
    ("Pragathi Nagar Lake", "pragathi-nagar"),
    ("Rangadhamuni Cheruvu", "rangadhamuni"),
    ("Safilguda Lake", "safilguda"),
    ("Malkam Cheruvu", "malkam-cheruvu"),
];

/// Lake id -> Bhuvan WBIS water-body id
const BUILTIN_BHUVAN_IDS: [(&str, &str); 3] = [
    ("hussain-sagar", "1007878045612624311"),
    ("osman-sagar", "1000959528031155202"),
    ("himayat-sagar", "1001150645686139370"),
];

/// Immutable lookup between lake names, lake ids and satellite ids
///
/// Several names may resolve to the same lake id. Build it once at
/// startup and share it behind an `Arc`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LakeCatalog {
    aliases: BTreeMap<String, String>,
    bhuvan_ids: BTreeMap<String, String>,
}

impl LakeCatalog {
    pub fn builtin() -> Self {
        Self::default()
            .with_aliases(BUILTIN_ALIASES)
            .with_bhuvan_ids(BUILTIN_BHUVAN_IDS)
    }

    /// Add or replace name -> lake id entries
    pub fn with_aliases<I, K, V>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.aliases
            .extend(aliases.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Add or replace lake id -> Bhuvan id entries
    pub fn with_bhuvan_ids<I, K, V>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.bhuvan_ids
            .extend(ids.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Lake id for a name exactly as it appears in the source data
    pub fn lake_id(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }

    pub fn bhuvan_id(&self, lake_id: &str) -> Option<&str> {
        self.bhuvan_ids.get(lake_id).map(String::as_str)
    }

    /// Every name that resolves to `lake_id`
    pub fn names_for<'a>(&'a self, lake_id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.aliases
            .iter()
            .filter(move |(_, id)| id.as_str() == lake_id)
            .map(|(name, _)| name.as_str())
    }

    /// All known lake ids, from either table
    pub fn lake_ids(&self) -> BTreeSet<&str> {
        self.aliases
            .values()
            .chain(self.bhuvan_ids.keys())
            .map(String::as_str)
            .collect()
    }
}
