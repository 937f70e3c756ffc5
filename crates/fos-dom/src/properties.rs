//! IDL Properties
//!
//! Table of the scriptable properties each element exposes and how a write
//! to them lands in the tree. Anything not in the table is not a property
//! of the element.

use crate::{Listener, Namespace};

/// How a property is backed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// String property reflecting the named attribute
    Reflect(&'static str),
    /// Boolean property reflecting presence of the named attribute
    ReflectBool(&'static str),
    /// `className`
    ClassName,
    /// `classList` (writes forward to the `class` attribute)
    ClassList,
    /// `dataset` (not assignable)
    Dataset,
    /// `style` (writes forward to `cssText`)
    Style,
    /// `textContent` / `innerText`
    TextContent,
    /// `innerHTML`
    InnerHtml,
    /// `on<type>` event handler
    Handler(&'static str),
    /// State held on the element without an attribute
    Stored,
    /// Present but not assignable
    ReadOnly,
}

/// Value written to or read from a property
#[derive(Debug, Clone)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Listener(Listener),
}

impl PropertyValue {
    /// DOMString conversion
    pub fn to_dom_string(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => number_to_dom_string(*n),
            Self::String(s) => s.clone(),
            Self::Listener(_) => "function () { [native code] }".to_string(),
        }
    }

    /// Boolean conversion
    pub fn truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => !s.is_empty(),
            Self::Listener(_) => true,
        }
    }

    /// String value, reading `null` as empty (`[LegacyNullToEmptyString]`)
    pub fn to_string_or_empty(&self) -> String {
        match self {
            Self::Null => String::new(),
            other => other.to_dom_string(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl PartialEq for PropertyValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Listener(a), Self::Listener(b)) => a.same(b),
            _ => false,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Number-to-string conversion as scripts see it: integral values print
/// without a fraction, very large and very small magnitudes use exponent
/// notation with an explicit sign.
pub fn number_to_dom_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{}", n);
    }
    let formatted = format!("{:e}", n);
    match formatted.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
        _ => formatted,
    }
}

/// Event types with an `on<type>` handler property
const HANDLER_EVENTS: &[&str] = &[
    "abort", "blur", "change", "click", "contextmenu", "dblclick", "error", "focus",
    "input", "keydown", "keypress", "keyup", "load", "mousedown", "mouseenter",
    "mouseleave", "mousemove", "mouseout", "mouseover", "mouseup", "pointerdown",
    "pointermove", "pointerup", "reset", "resize", "scroll", "select", "submit",
    "touchend", "touchmove", "touchstart", "wheel",
];

/// Properties shared by every element
fn element_property(name: &str) -> Option<PropertyKind> {
    let kind = match name {
        "id" => PropertyKind::Reflect("id"),
        "slot" => PropertyKind::Reflect("slot"),
        "className" => PropertyKind::ClassName,
        "classList" => PropertyKind::ClassList,
        "textContent" => PropertyKind::TextContent,
        "innerHTML" => PropertyKind::InnerHtml,
        "tagName" | "localName" | "namespaceURI" | "prefix" | "nodeName" | "nodeType"
        | "attributes" | "children" | "childNodes" | "parentNode" | "parentElement"
        | "firstChild" | "lastChild" | "ownerDocument" | "isConnected" => PropertyKind::ReadOnly,
        _ => return None,
    };
    Some(kind)
}

/// Properties of HTML, SVG and MathML elements (`HTMLOrSVGElement`,
/// `ElementCSSInlineStyle`, `GlobalEventHandlers`)
fn styled_element_property(name: &str) -> Option<PropertyKind> {
    match name {
        "style" => Some(PropertyKind::Style),
        "dataset" => Some(PropertyKind::Dataset),
        "tabIndex" => Some(PropertyKind::Reflect("tabindex")),
        "autofocus" => Some(PropertyKind::ReflectBool("autofocus")),
        "nonce" => Some(PropertyKind::Reflect("nonce")),
        _ => {
            let event = name.strip_prefix("on")?;
            let event = HANDLER_EVENTS.iter().copied().find(|e| *e == event)?;
            Some(PropertyKind::Handler(event))
        }
    }
}

fn html_global_property(name: &str) -> Option<PropertyKind> {
    let kind = match name {
        "title" => PropertyKind::Reflect("title"),
        "lang" => PropertyKind::Reflect("lang"),
        "dir" => PropertyKind::Reflect("dir"),
        "accessKey" => PropertyKind::Reflect("accesskey"),
        "draggable" => PropertyKind::Reflect("draggable"),
        "contentEditable" => PropertyKind::Reflect("contenteditable"),
        "inputMode" => PropertyKind::Reflect("inputmode"),
        "hidden" => PropertyKind::ReflectBool("hidden"),
        "inert" => PropertyKind::ReflectBool("inert"),
        "innerText" => PropertyKind::TextContent,
        "offsetWidth" | "offsetHeight" | "offsetTop" | "offsetLeft" | "offsetParent"
        | "isContentEditable" => PropertyKind::ReadOnly,
        _ => return None,
    };
    Some(kind)
}

fn html_tag_property(tag: &str, name: &str) -> Option<PropertyKind> {
    use PropertyKind::*;

    let kind = match (tag, name) {
        ("a", "href") | ("link", "href") | ("area", "href") | ("base", "href") => Reflect("href"),
        ("a" | "area" | "form" | "base", "target") => Reflect("target"),
        ("a" | "link" | "area", "rel") => Reflect("rel"),
        ("a" | "area", "download") => Reflect("download"),
        ("a" | "link", "hreflang") => Reflect("hreflang"),
        ("a" | "link" | "script" | "source" | "ol" | "embed" | "object", "type") => Reflect("type"),
        ("link" | "source" | "style", "media") => Reflect("media"),

        ("img" | "iframe" | "script" | "video" | "audio" | "source" | "embed" | "track" | "input", "src") => Reflect("src"),
        ("img" | "area" | "input", "alt") => Reflect("alt"),
        ("img" | "iframe" | "canvas" | "video" | "embed" | "object", "width") => Reflect("width"),
        ("img" | "iframe" | "canvas" | "video" | "embed" | "object", "height") => Reflect("height"),
        ("img" | "source", "srcset") => Reflect("srcset"),
        ("img" | "source", "sizes") => Reflect("sizes"),
        ("img" | "iframe", "loading") => Reflect("loading"),
        ("img", "decoding") => Reflect("decoding"),
        ("img" | "script" | "link" | "video" | "audio", "crossOrigin") => Reflect("crossorigin"),
        ("img" | "video" | "audio", "currentSrc") => ReadOnly,
        ("img", "naturalWidth" | "naturalHeight" | "complete") => ReadOnly,

        ("input" | "button" | "select" | "textarea" | "form" | "iframe" | "fieldset" | "output" | "object", "name") => Reflect("name"),
        ("input", "type") | ("button", "type") => Reflect("type"),
        ("input" | "textarea", "placeholder") => Reflect("placeholder"),
        ("input", "min") => Reflect("min"),
        ("input", "max") => Reflect("max"),
        ("input", "step") => Reflect("step"),
        ("input", "pattern") => Reflect("pattern"),
        ("input", "accept") => Reflect("accept"),
        ("input" | "form" | "select" | "textarea", "autocomplete") => Reflect("autocomplete"),
        ("input" | "textarea", "maxLength") => Reflect("maxlength"),
        ("input" | "textarea", "minLength") => Reflect("minlength"),
        ("input" | "button" | "select" | "textarea" | "fieldset" | "option" | "optgroup", "disabled") => ReflectBool("disabled"),
        ("input" | "select" | "textarea", "required") => ReflectBool("required"),
        ("input" | "textarea", "readOnly") => ReflectBool("readonly"),
        ("input" | "select", "multiple") => ReflectBool("multiple"),
        ("input", "defaultValue") => Reflect("value"),
        ("input", "defaultChecked") => ReflectBool("checked"),
        ("input" | "select" | "textarea", "value") => Stored,
        ("input", "checked" | "indeterminate") => Stored,
        ("button" | "option" | "data" | "li" | "param", "value") => Reflect("value"),
        ("input" | "button" | "select" | "textarea", "form" | "validity" | "labels" | "validationMessage" | "willValidate") => ReadOnly,

        ("textarea", "rows") => Reflect("rows"),
        ("textarea", "cols") => Reflect("cols"),
        ("textarea", "defaultValue") => TextContent,

        ("label" | "output", "htmlFor") => Reflect("for"),
        ("label", "control") => ReadOnly,

        ("form", "action") => Reflect("action"),
        ("form", "method") => Reflect("method"),
        ("form", "enctype") => Reflect("enctype"),
        ("form", "noValidate") => ReflectBool("novalidate"),
        ("form", "elements" | "length") => ReadOnly,

        ("option" | "optgroup", "label") => Reflect("label"),
        ("option", "selected") => Stored,
        ("option", "defaultSelected") => ReflectBool("selected"),
        ("option", "text") => TextContent,
        ("option", "index") => ReadOnly,
        ("select", "selectedIndex") => Stored,
        ("select", "options" | "selectedOptions" | "length") => ReadOnly,

        ("script", "async") => ReflectBool("async"),
        ("script", "defer") => ReflectBool("defer"),
        ("script", "text") => TextContent,
        ("script" | "link", "integrity") => Reflect("integrity"),

        ("video" | "audio", "controls") => ReflectBool("controls"),
        ("video" | "audio", "autoplay") => ReflectBool("autoplay"),
        ("video" | "audio", "loop") => ReflectBool("loop"),
        ("video" | "audio", "muted") => Stored,
        ("video" | "audio", "currentTime" | "volume" | "playbackRate") => Stored,
        ("video" | "audio", "duration" | "paused" | "ended" | "readyState") => ReadOnly,
        ("video", "poster") => Reflect("poster"),

        ("td" | "th", "colSpan") => Reflect("colspan"),
        ("td" | "th", "rowSpan") => Reflect("rowspan"),
        ("ol", "start") => Reflect("start"),
        ("ol", "reversed") => ReflectBool("reversed"),
        ("details" | "dialog", "open") => ReflectBool("open"),
        ("iframe", "srcdoc") => Reflect("srcdoc"),
        ("iframe", "allow") => Reflect("allow"),
        ("iframe", "contentWindow" | "contentDocument") => ReadOnly,
        ("canvas", "getContext") => ReadOnly,
        ("template", "content") => ReadOnly,
        _ => return None,
    };
    Some(kind)
}

/// SVG properties are animated values: present but not assignable
fn svg_property(tag: &str, name: &str) -> Option<PropertyKind> {
    let animated = match name {
        "className" | "ownerSVGElement" | "viewportElement" => true,
        "width" | "height" | "x" | "y" => matches!(
            tag,
            "svg" | "rect" | "image" | "use" | "foreignObject" | "pattern" | "mask" | "filter"
                | "symbol" | "text" | "tspan"
        ),
        "cx" | "cy" | "r" => matches!(tag, "circle" | "radialGradient"),
        "rx" | "ry" => matches!(tag, "ellipse" | "rect"),
        "x1" | "y1" | "x2" | "y2" => matches!(tag, "line" | "linearGradient"),
        "viewBox" | "preserveAspectRatio" => matches!(tag, "svg" | "symbol" | "marker" | "pattern" | "view"),
        "points" | "animatedPoints" => matches!(tag, "polyline" | "polygon"),
        "pathLength" => matches!(tag, "path" | "circle" | "ellipse" | "line" | "polyline" | "polygon" | "rect"),
        "transform" => !matches!(tag, "svg" | "symbol" | "stop"),
        "href" => matches!(tag, "a" | "use" | "image" | "linearGradient" | "radialGradient" | "pattern" | "textPath"),
        _ => false,
    };
    animated.then_some(PropertyKind::ReadOnly)
}

/// Look up a property on an element
pub fn lookup(namespace: &Namespace, local_name: &str, name: &str) -> Option<PropertyKind> {
    match namespace {
        Namespace::Html => html_tag_property(local_name, name)
            .or_else(|| html_global_property(name))
            .or_else(|| styled_element_property(name))
            .or_else(|| element_property(name)),
        // SVG overrides className with an animated string
        Namespace::Svg => svg_property(local_name, name)
            .or_else(|| styled_element_property(name))
            .or_else(|| element_property(name)),
        Namespace::MathMl => styled_element_property(name).or_else(|| element_property(name)),
        Namespace::Other(_) => element_property(name),
    }
}
