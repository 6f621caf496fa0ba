use std::collections::HashMap;
use std::sync::LazyLock;

/// Male base names and their Finnish, Swedish and Latin spellings.
const MALE_VARIANTS: &[(&str, &[&str])] = &[
    ("abraham", &["aapo", "aabraham", "abram"]),
    ("adam", &["aatami", "aadam"]),
    ("anders", &["antti", "andreas", "anttoni", "andrea"]),
    ("daniel", &["taneli", "danielus"]),
    ("elias", &["eelis", "eljas", "elia"]),
    ("erik", &["erkki", "ericus", "eric", "erich"]),
    ("gabriel", &["kaapro", "gabrielus"]),
    ("gustaf", &["kustaa", "gustav", "gustavus"]),
    ("henrik", &["heikki", "henricus", "hindrik", "henrich"]),
    ("isak", &["iisakki", "isaac", "isaacus", "iisak"]),
    ("jakob", &["jaakko", "jacob", "jacobus", "jaakob"]),
    ("johan", &["juho", "johannes", "juhana", "jussi", "johanes", "hans"]),
    ("josef", &["juuso", "joseph", "josephus"]),
    ("karl", &["kaarle", "carl", "kalle", "carolus"]),
    ("kristian", &["risto", "christian", "christianus", "kristianus"]),
    ("lars", &["lauri", "laurentius", "lasse"]),
    ("matti", &["mathias", "matts", "mats", "matias", "matthias"]),
    ("mikael", &["mikko", "michael", "michel", "mickel"]),
    ("nils", &["niilo", "nicolaus", "niklas", "nikolai"]),
    ("olof", &["olli", "olaus", "olle"]),
    ("petter", &["pekka", "petrus", "per", "pietari", "peter"]),
    ("samuel", &["samuli", "samuelus"]),
    ("simon", &["simo", "simeon"]),
    ("thomas", &["tuomas", "tomas", "thomasus"]),
];

/// Female base names and their Finnish, Swedish and Latin spellings.
const FEMALE_VARIANTS: &[(&str, &[&str])] = &[
    ("agneta", &["agnes", "aune", "agnetha"]),
    ("anna", &["anni", "annikki", "annika"]),
    ("beata", &["pieta", "beate"]),
    ("brita", &["brigitta", "briita", "birgitta", "pirkko", "britta"]),
    ("eva", &["eeva", "eve"]),
    ("hedvig", &["hedda", "hedvika"]),
    ("helena", &["leena", "lena", "heleena", "elena"]),
    ("johanna", &["hanna", "jooanna", "johana"]),
    ("justiina", &["justina", "stiina"]),
    ("kaisa", &["katarina", "karin", "catharina", "kaarina", "katariina", "carin"]),
    ("karolina", &["lina", "carolina", "karoliina"]),
    ("kristiina", &["stina", "kirsti", "christina", "kristina", "kerstin"]),
    ("liisa", &["elisabet", "lisa", "elisabeth", "lisbeta", "elisabetha", "lisbet"]),
    ("lovisa", &["loviisa", "louise", "lovise"]),
    ("magdalena", &["malin", "maalin", "madlena", "magdaleena"]),
    ("margareta", &["reeta", "greta", "marketta", "margaretha", "merta"]),
    ("maria", &["maija", "maja", "marja", "mari", "marie"]),
    ("sofia", &["sohvi", "sophia", "sofie"]),
    ("susanna", &["sanna", "susanne", "zuzanna"]),
    ("ulrika", &["riikka", "ulrica"]),
];

/// Variant → bases index over both tables. A spelling may belong to more
/// than one base.
pub(crate) struct NameTables {
    male_bases: HashMap<&'static str, Vec<&'static str>>,
    female_bases: HashMap<&'static str, Vec<&'static str>>,
}

type VariantTable = &'static [(&'static str, &'static [&'static str])];

fn index(table: VariantTable) -> HashMap<&'static str, Vec<&'static str>> {
    let mut out: HashMap<&'static str, Vec<&'static str>> = HashMap::new();
    for &(base, variants) in table {
        out.entry(base).or_default().push(base);
        for &variant in variants {
            let bases = out.entry(variant).or_default();
            if !bases.contains(&base) {
                bases.push(base);
            }
        }
    }
    out
}

pub(crate) static TABLES: LazyLock<NameTables> = LazyLock::new(|| NameTables {
    male_bases: index(MALE_VARIANTS),
    female_bases: index(FEMALE_VARIANTS),
});

impl NameTables {
    /// Bases a lowercase given name resolves to, male table first.
    pub(crate) fn bases_of(&self, given: &str) -> Vec<&'static str> {
        let mut out: Vec<&'static str> = Vec::new();
        for table in [&self.male_bases, &self.female_bases] {
            if let Some(bases) = table.get(given) {
                out.extend(bases.iter().copied());
            }
        }
        out
    }

    pub(crate) fn is_male(&self, given: &str) -> bool {
        self.male_bases.contains_key(given)
    }

    pub(crate) fn is_female(&self, given: &str) -> bool {
        self.female_bases.contains_key(given)
    }
}
