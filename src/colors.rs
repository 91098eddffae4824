//! Color-string parsing.
//!
//! Every color in the public API is a string, in an extended version of the
//! CSS syntax: a named color (`"red"`), a hex code (`"#f00"`, `"#ff0000"`,
//! `"#f008"`, `"#ff000080"`), or a functional form (`"rgb(255, 0, 0)"`,
//! `"rgba(255, 0, 0, 0.5)"`, `"hsl(0, 100%, 50%)"`, `"hsla(0, 100%, 50%, 0.5)"`).
//! The empty string is fully transparent.

use raylib::prelude::Color;

use crate::error::MicroError;

/// Parse a color string into an RGBA color.
pub fn color_from_name(name: &str) -> Result<Color, MicroError> {
    let key = name.trim().to_ascii_lowercase();

    if key.is_empty() {
        return Ok(Color::new(0, 0, 0, 0));
    }
    if let Some(hex) = key.strip_prefix('#') {
        return parse_hex(name, hex);
    }
    if let Some(inner) = functional(&key, "rgb") {
        let [r, g, b] = components::<3>(name, inner)?;
        return rgba_color(name, r, g, b, 1.0);
    }
    if let Some(inner) = functional(&key, "rgba") {
        let [r, g, b, a] = components::<4>(name, inner)?;
        return rgba_color(name, r, g, b, a);
    }
    if let Some(inner) = functional(&key, "hsl") {
        let [h, s, l] = components::<3>(name, inner)?;
        return hsla_color(name, h, s, l, 1.0);
    }
    if let Some(inner) = functional(&key, "hsla") {
        let [h, s, l, a] = components::<4>(name, inner)?;
        return hsla_color(name, h, s, l, a);
    }

    match NAMED.binary_search_by_key(&key.as_str(), |(n, _)| n) {
        Ok(i) => {
            let (r, g, b) = NAMED[i].1;
            Ok(Color::new(r, g, b, 255))
        }
        Err(_) => Err(invalid(name)),
    }
}

fn invalid(name: &str) -> MicroError {
    MicroError::Validation(format!("invalid color `{name}`"))
}

/// If `key` is `prefix(...)`, return the text between the parentheses.
fn functional<'a>(key: &'a str, prefix: &str) -> Option<&'a str> {
    key.strip_prefix(prefix)?
        .trim_start()
        .strip_prefix('(')?
        .trim_end()
        .strip_suffix(')')
}

/// Split a functional color body into exactly `N` numeric components.
/// Percent signs are stripped so `hsl` saturation/lightness parse the same
/// way as plain numbers.
fn components<const N: usize>(name: &str, inner: &str) -> Result<[f32; N], MicroError> {
    let mut out = [0.0f32; N];
    let mut parts = inner.split(',');
    for slot in out.iter_mut() {
        let part = parts.next().ok_or_else(|| invalid(name))?;
        *slot = part
            .trim()
            .trim_end_matches('%')
            .parse::<f32>()
            .map_err(|_| invalid(name))?;
    }
    if parts.next().is_some() {
        return Err(invalid(name));
    }
    Ok(out)
}

fn parse_hex(name: &str, hex: &str) -> Result<Color, MicroError> {
    // The length checks below count bytes and `pair` slices by byte index,
    // so a multibyte character must be rejected before slicing.
    if !hex.is_ascii() {
        return Err(invalid(name));
    }
    let digit = |i: usize| -> Result<u8, MicroError> {
        let c = hex.as_bytes()[i] as char;
        let v = c.to_digit(16).ok_or_else(|| invalid(name))? as u8;
        Ok(v * 16 + v)
    };
    let pair = |i: usize| -> Result<u8, MicroError> {
        u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid(name))
    };
    match hex.len() {
        3 => Ok(Color::new(digit(0)?, digit(1)?, digit(2)?, 255)),
        4 => Ok(Color::new(digit(0)?, digit(1)?, digit(2)?, digit(3)?)),
        6 => Ok(Color::new(pair(0)?, pair(2)?, pair(4)?, 255)),
        8 => Ok(Color::new(pair(0)?, pair(2)?, pair(4)?, pair(6)?)),
        _ => Err(invalid(name)),
    }
}

fn rgba_color(name: &str, r: f32, g: f32, b: f32, a: f32) -> Result<Color, MicroError> {
    for c in [r, g, b] {
        if !(0.0..=255.0).contains(&c) {
            return Err(invalid(name));
        }
    }
    if !(0.0..=1.0).contains(&a) {
        return Err(invalid(name));
    }
    Ok(Color::new(r as u8, g as u8, b as u8, (a * 255.0) as u8))
}

fn hsla_color(name: &str, h: f32, s: f32, l: f32, a: f32) -> Result<Color, MicroError> {
    if !(0.0..=360.0).contains(&h)
        || !(0.0..=100.0).contains(&s)
        || !(0.0..=100.0).contains(&l)
        || !(0.0..=1.0).contains(&a)
    {
        return Err(invalid(name));
    }
    let (r, g, b) = hsl_to_rgb(h / 360.0, s / 100.0, l / 100.0);
    Ok(Color::new(
        (r * 255.0) as u8,
        (g * 255.0) as u8,
        (b * 255.0) as u8,
        (a * 255.0) as u8,
    ))
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (f32, f32, f32) {
    if s == 0.0 {
        return (l, l, l);
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let hue = |mut t: f32| -> f32 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    };
    (hue(h + 1.0 / 3.0), hue(h), hue(h - 1.0 / 3.0))
}

/// CSS named colors, sorted by name for binary search.
const NAMED: &[(&str, (u8, u8, u8))] = &[
    ("aliceblue", (240, 248, 255)),
    ("antiquewhite", (250, 235, 215)),
    ("aqua", (0, 255, 255)),
    ("aquamarine", (127, 255, 212)),
    ("azure", (240, 255, 255)),
    ("beige", (245, 245, 220)),
    ("bisque", (255, 228, 196)),
    ("black", (0, 0, 0)),
    ("blanchedalmond", (255, 235, 205)),
    ("blue", (0, 0, 255)),
    ("blueviolet", (138, 43, 226)),
    ("brown", (165, 42, 42)),
    ("burlywood", (222, 184, 135)),
    ("cadetblue", (95, 158, 160)),
    ("chartreuse", (127, 255, 0)),
    ("chocolate", (210, 105, 30)),
    ("coral", (255, 127, 80)),
    ("cornflowerblue", (100, 149, 237)),
    ("cornsilk", (255, 248, 220)),
    ("crimson", (220, 20, 60)),
    ("cyan", (0, 255, 255)),
    ("darkblue", (0, 0, 139)),
    ("darkcyan", (0, 139, 139)),
    ("darkgoldenrod", (184, 134, 11)),
    ("darkgray", (169, 169, 169)),
    ("darkgreen", (0, 100, 0)),
    ("darkkhaki", (189, 183, 107)),
    ("darkmagenta", (139, 0, 139)),
    ("darkolivegreen", (85, 107, 47)),
    ("darkorange", (255, 140, 0)),
    ("darkorchid", (153, 50, 204)),
    ("darkred", (139, 0, 0)),
    ("darksalmon", (233, 150, 122)),
    ("darkseagreen", (143, 188, 143)),
    ("darkslateblue", (72, 61, 139)),
    ("darkslategray", (47, 79, 79)),
    ("darkturquoise", (0, 206, 209)),
    ("darkviolet", (148, 0, 211)),
    ("deeppink", (255, 20, 147)),
    ("deepskyblue", (0, 191, 255)),
    ("dimgray", (105, 105, 105)),
    ("dodgerblue", (30, 144, 255)),
    ("firebrick", (178, 34, 34)),
    ("floralwhite", (255, 250, 240)),
    ("forestgreen", (34, 139, 34)),
    ("fuchsia", (255, 0, 255)),
    ("gainsboro", (220, 220, 220)),
    ("ghostwhite", (248, 248, 255)),
    ("gold", (255, 215, 0)),
    ("goldenrod", (218, 165, 32)),
    ("gray", (128, 128, 128)),
    ("green", (0, 128, 0)),
    ("greenyellow", (173, 255, 47)),
    ("honeydew", (240, 255, 240)),
    ("hotpink", (255, 105, 180)),
    ("indianred", (205, 92, 92)),
    ("indigo", (75, 0, 130)),
    ("ivory", (255, 255, 240)),
    ("khaki", (240, 230, 140)),
    ("lavender", (230, 230, 250)),
    ("lavenderblush", (255, 240, 245)),
    ("lawngreen", (124, 252, 0)),
    ("lemonchiffon", (255, 250, 205)),
    ("lightblue", (173, 216, 230)),
    ("lightcoral", (240, 128, 128)),
    ("lightcyan", (224, 255, 255)),
    ("lightgoldenrodyellow", (250, 250, 210)),
    ("lightgray", (211, 211, 211)),
    ("lightgreen", (144, 238, 144)),
    ("lightpink", (255, 182, 193)),
    ("lightsalmon", (255, 160, 122)),
    ("lightseagreen", (32, 178, 170)),
    ("lightskyblue", (135, 206, 250)),
    ("lightslategray", (119, 136, 153)),
    ("lightsteelblue", (176, 196, 222)),
    ("lightyellow", (255, 255, 224)),
    ("lime", (0, 255, 0)),
    ("limegreen", (50, 205, 50)),
    ("linen", (250, 240, 230)),
    ("magenta", (255, 0, 255)),
    ("maroon", (128, 0, 0)),
    ("mediumaquamarine", (102, 205, 170)),
    ("mediumblue", (0, 0, 205)),
    ("mediumorchid", (186, 85, 211)),
    ("mediumpurple", (147, 112, 219)),
    ("mediumseagreen", (60, 179, 113)),
    ("mediumslateblue", (123, 104, 238)),
    ("mediumspringgreen", (0, 250, 154)),
    ("mediumturquoise", (72, 209, 204)),
    ("mediumvioletred", (199, 21, 133)),
    ("midnightblue", (25, 25, 112)),
    ("mintcream", (245, 255, 250)),
    ("mistyrose", (255, 228, 225)),
    ("moccasin", (255, 228, 181)),
    ("navajowhite", (255, 222, 173)),
    ("navy", (0, 0, 128)),
    ("oldlace", (253, 245, 230)),
    ("olive", (128, 128, 0)),
    ("olivedrab", (107, 142, 35)),
    ("orange", (255, 165, 0)),
    ("orangered", (255, 69, 0)),
    ("orchid", (218, 112, 214)),
    ("palegoldenrod", (238, 232, 170)),
    ("palegreen", (152, 251, 152)),
    ("paleturquoise", (175, 238, 238)),
    ("palevioletred", (219, 112, 147)),
    ("papayawhip", (255, 239, 213)),
    ("peachpuff", (255, 218, 185)),
    ("peru", (205, 133, 63)),
    ("pink", (255, 192, 203)),
    ("plum", (221, 160, 221)),
    ("powderblue", (176, 224, 230)),
    ("purple", (128, 0, 128)),
    ("red", (255, 0, 0)),
    ("rosybrown", (188, 143, 143)),
    ("royalblue", (65, 105, 225)),
    ("saddlebrown", (139, 69, 19)),
    ("salmon", (250, 128, 114)),
    ("sandybrown", (244, 164, 96)),
    ("seagreen", (46, 139, 87)),
    ("seashell", (255, 245, 238)),
    ("sienna", (160, 82, 45)),
    ("silver", (192, 192, 192)),
    ("skyblue", (135, 206, 235)),
    ("slateblue", (106, 90, 205)),
    ("slategray", (112, 128, 144)),
    ("snow", (255, 250, 250)),
    ("springgreen", (0, 255, 127)),
    ("steelblue", (70, 130, 180)),
    ("tan", (210, 180, 140)),
    ("teal", (0, 128, 128)),
    ("thistle", (216, 191, 216)),
    ("tomato", (255, 99, 71)),
    ("turquoise", (64, 224, 208)),
    ("violet", (238, 130, 238)),
    ("wheat", (245, 222, 179)),
    ("white", (255, 255, 255)),
    ("whitesmoke", (245, 245, 245)),
    ("yellow", (255, 255, 0)),
    ("yellowgreen", (154, 205, 50)),
];
