//! Rendering of the UMD wrapper around the selected modules.

use cow_utils::CowUtils;
use std::borrow::Cow;

use crate::loader::ModuleContent;
use crate::release::ReleaseInfo;

/// Line break used inside embedded blocks (utilities, module bodies, init)
const BLOCK_LINE_BREAK: &str = "\n  ";

/// Separator between `root.X = bsn.X;` lines in the browser-globals branch
const ATTACHMENT_SEPARATOR: &str = "\n    ";

/// Separator between entries of the returned export object
const EXPORT_SEPARATOR: &str = ",\n    ";

/// Everything the wrapper embeds, as explicit fields
#[derive(Debug, Clone, Copy)]
pub struct BundleTemplate<'a> {
    pub release: &'a ReleaseInfo,
    pub utilities: &'a str,
    /// Module bodies in selection order; their names drive attachments and exports
    pub modules: &'a [ModuleContent],
    pub init: &'a str,
}

/// A rendered bundle, split where minification stops
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBundle {
    /// Attribution line including its line break. Never minified.
    pub header: String,
    /// The UMD wrapper and everything inside it
    pub body: String,
}

impl RenderedBundle {
    pub fn into_text(self) -> String {
        self.header + &self.body
    }
}

impl BundleTemplate<'_> {
    pub fn render(&self) -> RenderedBundle {
        RenderedBundle {
            header: format!("{}\n", self.release.header_line()),
            body: self.render_body(),
        }
    }

    fn render_body(&self) -> String {
        let module_bodies: String = self
            .modules
            .iter()
            .map(|module| indent_block(&module.text))
            .collect();

        format!(
            "(function (root, factory) {{
    if (typeof define === 'function' && define.amd) {{
      // AMD support:
      define([], factory);
    }} else if (typeof module === 'object' && module.exports) {{
      // CommonJS-like:
      module.exports = factory();
    }} else {{
      // Browser globals (root is window)
      var bsn = factory();
      {attachments}
    }}
  }}(this, function () {{
    {utilities}
    BSN.version = '{version}';
    {modules}
    {init}
    return {{
      {exports}
    }};
  }}));",
            attachments = self.root_attachments(),
            utilities = indent_block(self.utilities),
            version = self.release.version,
            modules = module_bodies,
            init = indent_block(self.init),
            exports = self.export_entries(),
        )
    }

    /// `root.Name = bsn.Name;` for every module, in order
    fn root_attachments(&self) -> String {
        self.modules
            .iter()
            .map(|module| format!("root.{0} = bsn.{0};", module.name))
            .collect::<Vec<_>>()
            .join(ATTACHMENT_SEPARATOR)
    }

    /// `Name: Name` for every module, comma separated, no trailing comma
    fn export_entries(&self) -> String {
        self.modules
            .iter()
            .map(|module| format!("{0}: {0}", module.name))
            .collect::<Vec<_>>()
            .join(EXPORT_SEPARATOR)
    }
}

fn indent_block(text: &str) -> Cow<'_, str> {
    text.cow_replace('\n', BLOCK_LINE_BREAK)
}
