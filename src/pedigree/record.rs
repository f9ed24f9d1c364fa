#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize)]
/// Sex as recorded in the `Sex` column.
pub enum Sex {
    /// Stallion, colt or gelding (`H`, `C`, `G`, `S`).
    Male,
    /// Mare or filly (`M`, `F`).
    Female,
    #[default]
    Unknown,
}

impl Sex {
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "H" | "C" | "G" | "S" => Sex::Male,
            "M" | "F" => Sex::Female,
            _ => Sex::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// One horse from the record file. Never mutated after loading.
pub struct HorseRecord {
    pub primary_key: String,
    pub name: String,
    pub birth_year: Option<i32>,
    pub sire_key: Option<String>,
    pub dam_key: Option<String>,
    pub sex: Sex,
    pub color: String,
    pub details: String,
    pub url: String,
}

impl HorseRecord {
    /// Minimal record with only lineage fields; the name defaults to the key.
    pub fn new(
        primary_key: impl Into<String>,
        sire_key: Option<&str>,
        dam_key: Option<&str>,
    ) -> Self {
        let primary_key = primary_key.into();
        Self {
            name: primary_key.clone(),
            primary_key,
            birth_year: None,
            sire_key: sire_key.map(str::to_owned),
            dam_key: dam_key.map(str::to_owned),
            sex: Sex::Unknown,
            color: String::new(),
            details: String::new(),
            url: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_birth_year(mut self, year: i32) -> Self {
        self.birth_year = Some(year);
        self
    }

    pub fn with_sex(mut self, sex: Sex) -> Self {
        self.sex = sex;
        self
    }
}

#[derive(Clone, Debug, Default, serde::Deserialize)]
#[serde(default)]
/// Raw CSV row; every column is optional so partial files still load.
pub(crate) struct CsvRow {
    #[serde(rename = "PrimaryKey")]
    pub primary_key: String,
    #[serde(rename = "Horse Name")]
    pub name: String,
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "Sire")]
    pub sire: String,
    #[serde(rename = "Dam")]
    pub dam: String,
    #[serde(rename = "Sex")]
    pub sex: String,
    #[serde(rename = "Color")]
    pub color: String,
    #[serde(rename = "Details")]
    pub details: String,
    #[serde(rename = "URL")]
    pub url: String,
}

impl CsvRow {
    /// Normalize a row; `None` when the primary key is blank.
    pub(crate) fn into_record(self) -> Option<HorseRecord> {
        let primary_key = self.primary_key.trim().to_owned();
        if primary_key.is_empty() {
            return None;
        }
        let name = match self.name.trim() {
            "" => primary_key.clone(),
            n => n.to_owned(),
        };
        Some(HorseRecord {
            name,
            birth_year: self.year.trim().parse::<i32>().ok(),
            sire_key: non_blank(&self.sire),
            dam_key: non_blank(&self.dam),
            sex: Sex::from_code(&self.sex),
            color: self.color.trim().to_owned(),
            details: self.details.trim().to_owned(),
            url: self.url.trim().to_owned(),
            primary_key,
        })
    }
}

fn non_blank(raw: &str) -> Option<String> {
    let v = raw.trim();
    (!v.is_empty()).then(|| v.to_owned())
}

#[cfg(test)]
#[path = "../../tests/unit/pedigree/record.rs"]
mod tests;
