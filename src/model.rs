//! Static page content: the repository "regions" listed on the site and
//! the sort modes offered by the settings panel.

use crate::color;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    pub name: &'static str,
    pub name_full: &'static str,
    pub description: &'static str,
    pub info: &'static str,
    pub tags: &'static [&'static str],
    pub color: &'static str,
}

impl Region {
    /// Sort key for hue ordering: hue first, name to break ties.
    pub fn hue_key(&self) -> (u64, &'static str) {
        let [r, g, b, _] = color::parse_hex_color(self.color);
        let (hue, ..) = color::rgb_to_hsv(r, g, b);
        (hue as u64, self.name)
    }
}

pub fn regions() -> Vec<Region> {
    vec![
        Region {
            name: "crx",
            name_full: "Chrome Extension Building Tools",
            description: "Tools to help compile a Chrome extension from a userscript",
            info: "Command line application",
            tags: &["python", "userscript", "chrome"],
            color: "#4195dc",
        },
        Region {
            name: "uyt",
            name_full: "Usable YouTube",
            description: "Makes YouTube more usable",
            info: "Web browser extension",
            tags: &["javascript", "userscript", "youtube"],
            color: "#e42b28",
        },
        Region {
            name: "vsd",
            name_full: "Virtual SD Card Tools",
            description: "Easily create and manage virtual disks on Windows",
            info: "Command line application",
            tags: &["python", "windows"],
            color: "#60bf20",
        },
        Region {
            name: "lan",
            name_full: "Local Area Network File Sharing",
            description: "A simple way to share files across a local area network",
            info: "Command line application",
            tags: &["javascript", "node.js"],
            color: "#d73c9e",
        },
        Region {
            name: "264",
            name_full: "x264 Video Encoding Tools",
            description: "Easier x264 interaction with 32bit and 64bit processes",
            info: "Command line application",
            tags: &["python", "x264", "ffmpeg"],
            color: "#e38939",
        },
        Region {
            name: "t2m",
            name_full: "Torrent to Magnet",
            description: "Javascript implementation of magnet URI generation",
            info: "Web application & libraries",
            tags: &["javascript", "library"],
            color: "#30b194",
        },
        Region {
            name: "pyp",
            name_full: "Python Preprocessor",
            description: "Run python code inside files",
            info: "Command line application",
            tags: &["c", "python", "windows"],
            color: "#7d09c7",
        },
        Region {
            name: "ass",
            name_full: "Advanced SubStation Alpha Python Library",
            description: "Easy macro commands for modifying .ass files",
            info: "Python library",
            tags: &["python", "library", "subtitles"],
            color: "#ebcd31",
        },
        Region {
            name: "ebml",
            name_full: "EBML Library",
            description: "A library for reading, writing, and modifying the Matroska container's EBML format",
            info: "Python library",
            tags: &["python", "library"],
            color: "#4728c7",
        },
        Region {
            name: "noise",
            name_full: "Simplex Noise Library",
            description: "Templated CPU implementation of simplex noise",
            info: "C++ library",
            tags: &["c++", "library", "noise"],
            color: "#1cb327",
        },
    ]
}

/// Region list orderings selectable from the settings panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortMode {
    Name,
    Color,
}

impl SortMode {
    /// Hue ordering matches the server-rendered page, so it is the
    /// default.
    pub const DEFAULT: SortMode = SortMode::Color;

    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::Name => "name",
            SortMode::Color => "color",
        }
    }

    pub fn from_str(s: &str) -> Option<SortMode> {
        match s {
            "name" => Some(SortMode::Name),
            "color" => Some(SortMode::Color),
            _ => None,
        }
    }

    pub fn is_default(self) -> bool {
        self == Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hue_key_orders_regions_along_the_color_wheel() {
        let regions = regions();
        let red = regions.iter().find(|r| r.name == "uyt").unwrap();
        let green = regions.iter().find(|r| r.name == "vsd").unwrap();
        let blue = regions.iter().find(|r| r.name == "crx").unwrap();
        assert!(red.hue_key() < green.hue_key());
        assert!(green.hue_key() < blue.hue_key());
    }

    #[test]
    fn sort_mode_round_trips() {
        for mode in [SortMode::Name, SortMode::Color] {
            assert_eq!(SortMode::from_str(mode.as_str()), Some(mode));
        }
        assert_eq!(SortMode::from_str("hue"), None);
        assert!(SortMode::Color.is_default());
        assert!(!SortMode::Name.is_default());
    }
}
