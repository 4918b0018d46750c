//! Lensfun XML database.
//!
//! Reads the subset of the lensfun format needed for correction:
//!
//! ```xml
//! <lensdatabase version="2">
//!   <camera>
//!     <maker>Fujifilm</maker>
//!     <model>X-T5</model>
//!     <mount>Fujifilm X</mount>
//!     <cropfactor>1.526</cropfactor>
//!   </camera>
//!   <lens>
//!     <maker>Fujifilm</maker>
//!     <model>XF18-55mmF2.8-4 R LM OIS</model>
//!     <mount>Fujifilm X</mount>
//!     <calibration>
//!       <distortion model="ptlens" focal="18" a="0.011" b="-0.036" c="0"/>
//!       <tca model="linear" focal="18" kr="1.0002" kb="1.0001"/>
//!       <vignetting model="pa" focal="18" aperture="2.8" distance="10" k1="-0.4" k2="0.1" k3="0"/>
//!     </calibration>
//!   </lens>
//! </lensdatabase>
//! ```
//!
//! Unknown elements and models are skipped. Localised names (`lang="..."`)
//! are ignored when an unlocalised one exists.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, trace};

use crate::profile::{AtFocal, DistortionModel, LensProfile, TcaModel, Vignetting};
use crate::{LensError, LensResult};

/// Directories searched when no custom database is given.
pub const SYSTEM_PATHS: &[&str] = &[
    "/usr/share/lensfun/version_1",
    "/usr/local/share/lensfun/version_1",
    "/usr/share/lensfun",
    "/usr/local/share/lensfun",
];

/// Camera body entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Camera {
    /// Manufacturer.
    pub maker: String,
    /// Model name.
    pub model: String,
    /// Lens mount.
    pub mount: String,
    /// Sensor crop factor.
    pub crop_factor: f32,
}

/// Parsed database.
#[derive(Debug, Clone, Default)]
pub struct LensDatabase {
    /// Camera bodies.
    pub cameras: Vec<Camera>,
    /// Lens profiles.
    pub lenses: Vec<LensProfile>,
}

impl LensDatabase {
    /// Loads a single XML file or every `*.xml` file in a directory.
    pub fn load(path: &Path) -> LensResult<Self> {
        let mut db = Self::default();
        if path.is_dir() {
            let mut files: Vec<PathBuf> = std::fs::read_dir(path)?
                .filter_map(|e| e.ok().map(|e| e.path()))
                .filter(|p| {
                    p.extension()
                        .is_some_and(|e| e.eq_ignore_ascii_case("xml"))
                })
                .collect();
            files.sort();
            for file in files {
                db.merge(Self::load_file(&file)?);
            }
        } else {
            db = Self::load_file(path)?;
        }
        debug!(
            path = %path.display(),
            cameras = db.cameras.len(),
            lenses = db.lenses.len(),
            "loaded lens database"
        );
        Ok(db)
    }

    /// Loads from `custom` if given, else from the first system directory
    /// that exists.
    pub fn open(custom: Option<&Path>) -> LensResult<Self> {
        if let Some(path) = custom {
            return Self::load(path);
        }
        let dir = SYSTEM_PATHS
            .iter()
            .map(Path::new)
            .find(|p| p.is_dir())
            .ok_or_else(|| {
                LensError::NoDatabase(format!("none of {} exist", SYSTEM_PATHS.join(", ")))
            })?;
        Self::load(dir)
    }

    fn load_file(path: &Path) -> LensResult<Self> {
        let file = File::open(path)?;
        Self::parse(BufReader::new(file)).map_err(|e| match e {
            LensError::Xml { msg, .. } => LensError::Xml {
                file: path.display().to_string(),
                msg,
            },
            other => other,
        })
    }

    /// Appends another database's entries.
    pub fn merge(&mut self, other: Self) {
        self.cameras.extend(other.cameras);
        self.lenses.extend(other.lenses);
    }

    /// Finds a lens by model name, ignoring case.
    ///
    /// An exact match wins over a containment match in either direction.
    /// `maker`, when given and matched by any candidate, narrows the search.
    pub fn find_lens(&self, maker: Option<&str>, model: &str) -> Option<&LensProfile> {
        let model = model.trim().to_lowercase();
        let by_maker: Vec<&LensProfile> = match maker {
            Some(m) => self
                .lenses
                .iter()
                .filter(|l| l.maker.eq_ignore_ascii_case(m.trim()))
                .collect(),
            None => Vec::new(),
        };
        let pool: Vec<&LensProfile> = if by_maker.is_empty() {
            self.lenses.iter().collect()
        } else {
            by_maker
        };

        pool.iter()
            .find(|l| l.model.to_lowercase() == model)
            .or_else(|| {
                pool.iter().find(|l| {
                    let m = l.model.to_lowercase();
                    m.contains(&model) || model.contains(&m)
                })
            })
            .copied()
    }

    /// Finds a camera body by model name, ignoring case.
    pub fn find_camera(&self, maker: Option<&str>, model: &str) -> Option<&Camera> {
        self.cameras.iter().find(|c| {
            c.model.eq_ignore_ascii_case(model.trim())
                && maker.is_none_or(|m| c.maker.eq_ignore_ascii_case(m.trim()))
        })
    }

    /// Parses one lensfun XML document.
    pub fn parse<R: BufRead>(reader: R) -> LensResult<Self> {
        let mut xml = Reader::from_reader(reader);
        xml.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut db = Self::default();
        let mut entry = Entry::None;
        let mut field: Option<(Field, bool)> = None;

        loop {
            match xml.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => match e.name().as_ref() {
                    b"camera" => entry = Entry::Camera(Camera::default(), Seen::default()),
                    b"lens" => entry = Entry::Lens(LensProfile::default(), Seen::default()),
                    b"distortion" | b"tca" | b"vignetting" => entry.calibration(e),
                    name => field = Field::from_tag(name).map(|f| (f, has_lang(e))),
                },
                Ok(Event::Empty(ref e)) => entry.calibration(e),
                Ok(Event::Text(ref e)) => {
                    if let Some((f, localised)) = field {
                        let text = e.decode().unwrap_or_default();
                        entry.set(f, text.trim(), localised);
                    }
                }
                Ok(Event::End(ref e)) => {
                    field = None;
                    match e.name().as_ref() {
                        b"camera" => {
                            if let Entry::Camera(cam, _) = std::mem::take(&mut entry) {
                                db.cameras.push(cam);
                            }
                        }
                        b"lens" => {
                            if let Entry::Lens(lens, _) = std::mem::take(&mut entry) {
                                trace!(lens = %lens.model, "parsed lens");
                                db.lenses.push(lens);
                            }
                        }
                        _ => {}
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(LensError::Xml {
                        file: String::from("<input>"),
                        msg: format!("at byte {}: {e}", xml.buffer_position()),
                    })
                }
                _ => {}
            }
            buf.clear();
        }
        Ok(db)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Maker,
    Model,
    Mount,
    CropFactor,
}

impl Field {
    fn from_tag(name: &[u8]) -> Option<Self> {
        match name {
            b"maker" => Some(Self::Maker),
            b"model" => Some(Self::Model),
            b"mount" => Some(Self::Mount),
            b"cropfactor" => Some(Self::CropFactor),
            _ => None,
        }
    }
}

/// Which text fields already hold an unlocalised value.
#[derive(Debug, Default)]
struct Seen {
    maker: bool,
    model: bool,
}

#[derive(Debug, Default)]
enum Entry {
    #[default]
    None,
    Camera(Camera, Seen),
    Lens(LensProfile, Seen),
}

impl Entry {
    fn set(&mut self, field: Field, text: &str, localised: bool) {
        // A localised name only fills an empty slot; an unlocalised one
        // replaces anything but another unlocalised one.
        let take = |slot: &String, seen: bool| {
            if localised { slot.is_empty() } else { !seen }
        };
        match self {
            Self::Camera(cam, seen) => match field {
                Field::Maker if take(&cam.maker, seen.maker) => {
                    cam.maker = text.to_string();
                    seen.maker |= !localised;
                }
                Field::Model if take(&cam.model, seen.model) => {
                    cam.model = text.to_string();
                    seen.model |= !localised;
                }
                Field::Mount if cam.mount.is_empty() => cam.mount = text.to_string(),
                Field::CropFactor => cam.crop_factor = text.parse().unwrap_or(1.0),
                _ => {}
            },
            Self::Lens(lens, seen) => match field {
                Field::Maker if take(&lens.maker, seen.maker) => {
                    lens.maker = text.to_string();
                    seen.maker |= !localised;
                }
                Field::Model if take(&lens.model, seen.model) => {
                    lens.model = text.to_string();
                    seen.model |= !localised;
                }
                Field::Mount => lens.mounts.push(text.to_string()),
                Field::CropFactor => lens.crop_factor = text.parse().unwrap_or(1.0),
                _ => {}
            },
            Self::None => {}
        }
    }

    fn calibration(&mut self, e: &BytesStart<'_>) {
        let Self::Lens(lens, _) = self else {
            return;
        };
        let attrs = Attrs::read(e);
        let Some(focal) = attrs.num("focal") else {
            return;
        };

        match (e.name().as_ref(), attrs.text("model").as_deref()) {
            (b"distortion", Some("ptlens")) => lens.distortion.push(AtFocal {
                focal,
                model: DistortionModel::PtLens {
                    a: attrs.num_or_zero("a"),
                    b: attrs.num_or_zero("b"),
                    c: attrs.num_or_zero("c"),
                },
            }),
            (b"distortion", Some("poly3")) => lens.distortion.push(AtFocal {
                focal,
                model: DistortionModel::Poly3 { k1: attrs.num_or_zero("k1") },
            }),
            (b"distortion", Some("poly5")) => lens.distortion.push(AtFocal {
                focal,
                model: DistortionModel::Poly5 {
                    k1: attrs.num_or_zero("k1"),
                    k2: attrs.num_or_zero("k2"),
                },
            }),
            (b"tca", Some("linear")) => lens.tca.push(AtFocal {
                focal,
                model: TcaModel::Linear {
                    kr: attrs.num("kr").unwrap_or(1.0),
                    kb: attrs.num("kb").unwrap_or(1.0),
                },
            }),
            (b"tca", Some("poly3")) => lens.tca.push(AtFocal {
                focal,
                model: TcaModel::Poly3 {
                    vr: attrs.num("vr").unwrap_or(1.0),
                    vb: attrs.num("vb").unwrap_or(1.0),
                    cr: attrs.num_or_zero("cr"),
                    cb: attrs.num_or_zero("cb"),
                    br: attrs.num_or_zero("br"),
                    bb: attrs.num_or_zero("bb"),
                },
            }),
            (b"vignetting", Some("pa")) => lens.vignetting.push(Vignetting {
                focal,
                aperture: attrs.num("aperture").unwrap_or(0.0),
                distance: attrs.num("distance").unwrap_or(1000.0),
                k1: attrs.num_or_zero("k1"),
                k2: attrs.num_or_zero("k2"),
                k3: attrs.num_or_zero("k3"),
            }),
            (kind, model) => trace!(
                element = %String::from_utf8_lossy(kind),
                model = ?model,
                "skipping calibration"
            ),
        }
    }
}

fn has_lang(e: &BytesStart<'_>) -> bool {
    e.attributes().flatten().any(|a| a.key.as_ref() == b"lang")
}

struct Attrs(Vec<(Vec<u8>, String)>);

impl Attrs {
    fn read(e: &BytesStart<'_>) -> Self {
        Self(
            e.attributes()
                .flatten()
                .map(|a| (a.key.as_ref().to_vec(), String::from_utf8_lossy(&a.value).into_owned()))
                .collect(),
        )
    }

    fn text(&self, key: &str) -> Option<String> {
        self.0
            .iter()
            .find(|(k, _)| k.as_slice() == key.as_bytes())
            .map(|(_, v)| v.clone())
    }

    fn num(&self, key: &str) -> Option<f32> {
        self.text(key)?.trim().parse().ok()
    }

    fn num_or_zero(&self, key: &str) -> f32 {
        self.num(key).unwrap_or(0.0)
    }
}
