//! Turns arrival predictions into the strings and pictures shown on the sign.

use ledsign_gfx::{render_multiline, GlyphStore, RenderError, RenderOptions};

/// Character code of the wide-gap warning glyph (defined in
/// `fonts/specific.glyphs`), shown instead of `'-'` before an arrival that
/// leaves a long wait.
pub const GAP_MARKER: u8 = 128;

/// Ordered minutes-until-arrival, as produced by the transit prediction feed.
/// The feed itself lives outside this program; anything that can answer these
/// two queries can drive the sign.
pub trait ArrivalSource {
    fn arrivals(&self, route: &str, direction: &str, stop: &str) -> Option<Vec<i64>>;
    fn all_arrivals(&self, stop: &str) -> Vec<(String, Vec<i64>)>;
}

/// Arrival times handed over on the command line.
pub struct FixedArrivals {
    entries: Vec<(String, Vec<i64>)>,
}

impl FixedArrivals {
    pub fn new(entries: Vec<(String, Vec<i64>)>) -> Self {
        Self { entries }
    }
}

impl ArrivalSource for FixedArrivals {
    fn arrivals(&self, route: &str, _direction: &str, _stop: &str) -> Option<Vec<i64>> {
        self.entries
            .iter()
            .find(|(entry_route, _)| entry_route == route)
            .map(|(_, minutes)| minutes.clone())
    }

    fn all_arrivals(&self, _stop: &str) -> Vec<(String, Vec<i64>)> {
        self.entries.clone()
    }
}

/// clap value parser for `--arrivals ROUTE=3,9,24`.
pub fn parse_arrival_spec(spec: &str) -> Result<(String, Vec<i64>), String> {
    let (route, minutes) = spec
        .split_once('=')
        .ok_or_else(|| format!("expected ROUTE=MINUTES,..., got {:?}", spec))?;
    let minutes = minutes
        .split(',')
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.trim()
                .parse()
                .map_err(|_| format!("bad minute value {:?}", part))
        })
        .collect::<Result<Vec<i64>, String>>()?;
    Ok((route.to_string(), minutes))
}

/// Builds the single-line display string `<route><sep><m1><sep><m2>...`,
/// where the separator is `'-'`, or the gap marker when the wait since the
/// previous arrival is at least `bad_timing` minutes.
pub fn prediction_line(route: &str, minutes: &[i64], bad_timing: i64) -> Vec<u8> {
    let mut line = route.as_bytes().to_vec();
    let mut prev = 0;
    for &t in minutes {
        line.push(if t - prev >= bad_timing {
            GAP_MARKER
        } else {
            b'-'
        });
        line.extend(t.to_string().into_bytes());
        prev = t;
    }
    line
}

/// The feed's route names are not what the sign shows. For now this only
/// splits the combined KT line by direction.
pub fn fixup_route_name(route: &str, direction: &str) -> String {
    if route.starts_with("KT") {
        if direction == "outbound" {
            "K-Ingleside".to_string()
        } else {
            "T-Third Street".to_string()
        }
    } else {
        route.to_string()
    }
}

/// Whole-stop overview: per route, the route name stacked over its next two
/// arrival times, the per-route pictures joined by a blank line. Routes with
/// no predictions are skipped.
pub fn stop_overview(
    store: &GlyphStore,
    arrivals: &[(String, Vec<i64>)],
    direction: &str,
    line_height: u32,
    opts: RenderOptions,
) -> Result<String, RenderError> {
    let opts = RenderOptions { distance: 0, ..opts };

    let mut texts = Vec::new();
    for (route, minutes) in arrivals {
        let prediction_text = minutes
            .iter()
            .take(2)
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(" & ");
        if prediction_text.is_empty() {
            continue;
        }

        let name = fixup_route_name(route, direction);
        let pic = render_multiline(
            store,
            &[name.as_bytes(), prediction_text.as_bytes()],
            line_height,
            opts,
        )?;
        texts.push(pic.to_text());
    }

    Ok(texts.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledsign_gfx::GlyphStoreBuilder;

    #[test]
    fn prediction_line_uses_a_dash_for_short_gaps() {
        assert_eq!(prediction_line("F", &[3, 9], 13), b"F-3-9".to_vec());
    }

    #[test]
    fn prediction_line_marks_long_gaps() {
        let line = prediction_line("F", &[3, 24], 13);
        assert_eq!(line, vec![b'F', b'-', b'3', GAP_MARKER, b'2', b'4']);
    }

    #[test]
    fn gap_is_measured_from_the_previous_arrival() {
        // First gap counts from "now" (minute zero).
        let line = prediction_line("F", &[14], 13);
        assert_eq!(line, vec![b'F', GAP_MARKER, b'1', b'4']);
    }

    #[test]
    fn kt_route_splits_by_direction() {
        assert_eq!(fixup_route_name("KT", "outbound"), "K-Ingleside");
        assert_eq!(fixup_route_name("KT", "inbound"), "T-Third Street");
        assert_eq!(fixup_route_name("F", "inbound"), "F");
    }

    #[test]
    fn arrival_spec_parsing() {
        assert_eq!(
            parse_arrival_spec("F=3,9,24"),
            Ok(("F".to_string(), vec![3, 9, 24]))
        );
        assert_eq!(parse_arrival_spec("N="), Ok(("N".to_string(), vec![])));
        assert!(parse_arrival_spec("F").is_err());
        assert!(parse_arrival_spec("F=x").is_err());
    }

    #[test]
    fn shipped_fonts_cover_the_display_strings() {
        let mut builder = GlyphStoreBuilder::new();
        builder.load(include_str!("../fonts/7x7.glyphs"));
        builder.load(include_str!("../fonts/amends.glyphs"));
        builder.load(include_str!("../fonts/specific.glyphs"));
        let store = builder.build();

        let opts = RenderOptions {
            ignore_shift_h: true,
            ..RenderOptions::default()
        };

        // Every string the binary can put on the sign must be renderable,
        // including the lowercase fixup names and the gap marker.
        for direction in ["inbound", "outbound"] {
            let name = fixup_route_name("KT", direction);
            assert!(ledsign_gfx::render(&store, name.as_bytes(), 8, opts).is_ok());
        }
        let line = prediction_line("KT", &[2, 15], 13);
        assert!(ledsign_gfx::render(&store, &line, 8, opts).is_ok());

        let arrivals = vec![("KT".to_string(), vec![2, 15])];
        assert!(stop_overview(&store, &arrivals, "outbound", 8, opts).is_ok());
    }

    #[test]
    fn overview_skips_routes_without_predictions() {
        // One-pixel glyphs for everything the overview needs.
        let mut builder = GlyphStoreBuilder::new();
        for code in [b'F', b'3', b'9', b' ', b'&'] {
            builder.load(&format!("{} 0 1\n1\n\n", code));
        }
        let store = builder.build();
        let arrivals = vec![
            ("F".to_string(), vec![3, 9, 24]),
            ("J".to_string(), vec![]),
        ];

        let opts = RenderOptions {
            ignore_shift_h: true,
            ..RenderOptions::default()
        };
        let text = stop_overview(&store, &arrivals, "inbound", 2, opts).unwrap();

        // A single route block: no blank-line separator, only the first two
        // predictions shown.
        assert!(!text.contains("\n\n"));
        // Width of the widest line: "3 & 9" is 5 one-pixel glyphs plus their
        // intervals.
        assert_eq!(text.lines().next().unwrap().len(), 10);
    }
}
