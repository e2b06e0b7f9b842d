use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{OverlayError, OverlayResult};
use crate::scene::style::FontFamily;

/// Explicit family -> font file table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontTable {
    files: BTreeMap<FontFamily, String>,
}

impl Default for FontTable {
    fn default() -> Self {
        let files = FontFamily::ALL
            .into_iter()
            .map(|f| (f, default_file_for(f).to_owned()))
            .collect();
        Self { files }
    }
}

fn default_file_for(family: FontFamily) -> &'static str {
    match family {
        FontFamily::Meme => "impact.ttf",
        FontFamily::Modern => "roboto.ttf",
        FontFamily::Elegant => "playfair.ttf",
    }
}

impl FontTable {
    /// File name backing `family`.
    pub fn file_for(&self, family: FontFamily) -> &str {
        self.files
            .get(&family)
            .map(String::as_str)
            .unwrap_or_else(|| default_file_for(family))
    }

    /// Replace the file backing `family`.
    pub fn with_file(mut self, family: FontFamily, file: impl Into<String>) -> Self {
        self.files.insert(family, file.into());
        self
    }
}

impl Serialize for FontTable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.files.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FontTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Partial tables merge over the defaults.
        let overrides = BTreeMap::<FontFamily, String>::deserialize(deserializer)?;
        let mut table = Self::default();
        table.files.extend(overrides);
        Ok(table)
    }
}

/// Where a loaded font came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FontOrigin {
    /// The family's own asset file.
    Asset(PathBuf),
    /// The configured fallback file.
    FallbackFile(PathBuf),
    /// A face picked from the platform's installed fonts.
    System(String),
}

impl FontOrigin {
    /// `true` unless the family's own asset was used.
    pub fn is_fallback(&self) -> bool {
        !matches!(self, Self::Asset(_))
    }
}

impl std::fmt::Display for FontOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Asset(p) => write!(f, "asset {}", p.display()),
            Self::FallbackFile(p) => write!(f, "fallback file {}", p.display()),
            Self::System(name) => write!(f, "system font {name}"),
        }
    }
}

/// Font bytes plus the handles the shaper and rasterizer need. Immutable after load.
#[derive(Clone)]
pub struct LoadedFont {
    /// Raw font file bytes.
    pub bytes: Arc<Vec<u8>>,
    /// Face index inside `bytes` (non-zero only for collections).
    pub index: u32,
    /// Primary family name reported by the font.
    pub family_name: String,
    /// Where the bytes came from.
    pub origin: FontOrigin,
    pub(crate) data: vello_cpu::peniko::FontData,
}

impl std::fmt::Debug for LoadedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedFont")
            .field("bytes_len", &self.bytes.len())
            .field("index", &self.index)
            .field("family_name", &self.family_name)
            .field("origin", &self.origin)
            .finish()
    }
}

impl LoadedFont {
    /// Parse font bytes, rejecting data that holds no usable face.
    ///
    /// The bytes are stored once; the face lookup, the shaper and the rasterizer all share them.
    pub fn from_bytes(bytes: Vec<u8>, index: u32, origin: FontOrigin) -> OverlayResult<Self> {
        let bytes = Arc::new(bytes);

        let mut db = usvg::fontdb::Database::new();
        db.load_font_source(usvg::fontdb::Source::Binary(bytes.clone()));
        let face = db
            .faces()
            .find(|f| f.index == index)
            .ok_or_else(|| OverlayError::render(format!("no usable font face in {origin}")))?;
        let family_name = face
            .families
            .first()
            .map(|(name, _)| name.clone())
            .unwrap_or_default();

        let data =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::new(bytes.clone()), index);
        Ok(Self {
            bytes,
            index,
            family_name,
            origin,
            data,
        })
    }

    /// Read and parse a font file.
    pub fn from_file(path: &Path, origin: FontOrigin) -> OverlayResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read font file '{}'", path.display()))?;
        Self::from_bytes(bytes, 0, origin)
    }
}

/// Families tried, in order, when picking an installed font.
const SYSTEM_FALLBACK_NAMES: [&str; 5] = [
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Arial",
    "Helvetica",
];

/// Resolves and caches fonts per family; share it across renders behind an `Arc`.
///
/// A family whose asset is missing or unreadable is served by the fallback font, so lookups only
/// fail when no font at all can be found.
#[derive(Debug)]
pub struct FontBook {
    table: FontTable,
    fonts_dir: PathBuf,
    fallback_file: Option<PathBuf>,
    loaded: Mutex<HashMap<FontFamily, Arc<LoadedFont>>>,
    fallback: Mutex<Option<Arc<LoadedFont>>>,
}

impl FontBook {
    /// Book resolving `table` entries inside `fonts_dir`.
    pub fn new(table: FontTable, fonts_dir: impl Into<PathBuf>) -> Self {
        Self {
            table,
            fonts_dir: fonts_dir.into(),
            fallback_file: None,
            loaded: Mutex::new(HashMap::new()),
            fallback: Mutex::new(None),
        }
    }

    /// Try `path` before installed fonts when an asset is unavailable.
    pub fn with_fallback_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.fallback_file = Some(path.into());
        self
    }

    /// The family -> file table in use.
    pub fn table(&self) -> &FontTable {
        &self.table
    }

    /// Absolute-or-relative path of the asset backing `family`.
    pub fn asset_path(&self, family: FontFamily) -> PathBuf {
        self.fonts_dir.join(self.table.file_for(family))
    }

    /// Font for `family`, loading it on first use.
    pub fn font_for(&self, family: FontFamily) -> OverlayResult<Arc<LoadedFont>> {
        if let Some(f) = self
            .loaded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&family)
        {
            return Ok(Arc::clone(f));
        }

        let path = self.asset_path(family);
        let font = match LoadedFont::from_file(&path, FontOrigin::Asset(path.clone())) {
            Ok(f) => Arc::new(f),
            Err(err) => {
                tracing::warn!(
                    %family,
                    path = %path.display(),
                    error = %err,
                    "font asset unavailable, substituting fallback font"
                );
                self.fallback_font()?
            }
        };

        let mut loaded = self.loaded.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(loaded.entry(family).or_insert(font)))
    }

    /// The font used when an asset is unavailable.
    pub fn fallback_font(&self) -> OverlayResult<Arc<LoadedFont>> {
        let mut slot = self.fallback.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(f) = slot.as_ref() {
            return Ok(Arc::clone(f));
        }

        let font = Arc::new(self.resolve_fallback()?);
        tracing::debug!(origin = %font.origin, family = %font.family_name, "resolved fallback font");
        *slot = Some(Arc::clone(&font));
        Ok(font)
    }

    fn resolve_fallback(&self) -> OverlayResult<LoadedFont> {
        if let Some(path) = self.fallback_file.as_deref() {
            match LoadedFont::from_file(path, FontOrigin::FallbackFile(path.to_path_buf())) {
                Ok(f) => return Ok(f),
                Err(err) => tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "configured fallback font unavailable, trying system fonts"
                ),
            }
        }
        load_system_font()
    }
}

fn load_system_font() -> OverlayResult<LoadedFont> {
    use usvg::fontdb::{Database, Family, Query, Stretch, Style, Weight};

    let mut db = Database::new();
    db.load_system_fonts();

    let mut families: Vec<Family<'_>> = SYSTEM_FALLBACK_NAMES
        .into_iter()
        .map(Family::Name)
        .collect();
    families.push(Family::SansSerif);

    let query = Query {
        families: &families,
        weight: Weight::NORMAL,
        stretch: Stretch::Normal,
        style: Style::Normal,
    };

    let id = db
        .query(&query)
        .or_else(|| db.faces().next().map(|f| f.id))
        .ok_or_else(|| OverlayError::render("no font asset and no system font available"))?;

    let name = db
        .face(id)
        .and_then(|f| f.families.first().map(|(n, _)| n.clone()))
        .unwrap_or_else(|| "unnamed".to_owned());
    let (bytes, index) = db
        .with_face_data(id, |data, index| (data.to_vec(), index))
        .ok_or_else(|| OverlayError::render(format!("system font '{name}' has no data")))?;

    LoadedFont::from_bytes(bytes, index, FontOrigin::System(name))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
