//! Wraps long `<pre>` blocks in collapsible containers.
//!
//! Injects a stylesheet and a script into `<head>` (once, keyed on the
//! stylesheet's id), then wraps every sufficiently long code block in a
//! `div.collapsible-container` that the script collapses, with expand and
//! copy-to-clipboard buttons.

use crate::dom::{self, Document, Node};
use log::info;

pub const DEFAULT_MAX_LINES: usize = 6;

/// Id of the injected stylesheet; its presence marks an already processed
/// document.
const CSS_ID: &str = "collapsible-styles";

const COLLAPSIBLE_CSS: &str = r#"
/* Collapsible container around long code blocks */
.collapsible-container {
  position: relative;
  overflow: hidden;
  transition: max-height 0.3s ease;
  border-radius: 8px;
  margin: 0;
}
.collapsible-container pre {
  margin: 0;
  line-height: 1.4;
}
.collapsible-container .toggle-button {
  position: absolute;
  top: 8px;
  right: 8px;
  background: rgba(255,255,255,0.9);
  border: 1px solid #ccc;
  cursor: pointer;
  font-size: 16px;
  line-height: 1;
  padding: 4px 8px;
  border-radius: 4px;
  z-index: 10;
  box-shadow: 0 2px 4px rgba(0,0,0,0.1);
}
.collapsible-container .toggle-button:hover {
  background: rgba(255,255,255,1);
}
.collapsible-container .copy-button {
  position: absolute;
  top: 8px;
  width: 24px;
  display: flex;
  align-items: center;
  justify-content: center;
  right: 48px;
  background: rgba(255,255,255,0.9);
  border: 1px solid #ccc;
  cursor: pointer;
  font-size: 16px;
  line-height: 1;
  padding: 4px 8px;
  border-radius: 4px;
  z-index: 10;
  box-shadow: 0 2px 4px rgba(0,0,0,0.1);
}
.collapsible-container .copy-button:hover {
  background: rgba(255,255,255,1);
}
.collapsible-container .fade-overlay {
  position: absolute;
  bottom: -1px;
  left: 0;
  right: 0;
  height: 42px;
  background: linear-gradient(
    to bottom,
    rgba(255,249,229,0),
    rgba(255,249,229,1)
  );
  pointer-events: none;
  z-index: 5;
  border-bottom-left-radius: 8px;
  border-bottom-right-radius: 8px;
}
.collapsible-container .ellipsis {
  position: absolute;
  bottom: 8px;
  width: 100%;
  text-align: center;
  color: #888;
  font-size: 18px;
  font-weight: bold;
  z-index: 6;
}
.collapsible-container.expanded .fade-overlay,
.collapsible-container.expanded .ellipsis {
  display: none;
}
"#;

const COLLAPSIBLE_JS: &str = r#"(function() {
  function initCollapsibles() {
    // Give the stylesheet a moment to apply before measuring.
    setTimeout(() => {
      document.querySelectorAll('.collapsible-container').forEach(container => {
        const pre = container.querySelector('pre');
        if (!pre) return;

        const maxLines = parseInt(container.dataset.maxLines, 10) || 6;

        // Measure the line height with a hidden throwaway element.
        const tempSpan = document.createElement('span');
        tempSpan.style.visibility = 'hidden';
        tempSpan.style.position = 'absolute';
        tempSpan.style.fontSize = getComputedStyle(pre).fontSize;
        tempSpan.style.fontFamily = getComputedStyle(pre).fontFamily;
        tempSpan.style.lineHeight = '1.4';
        tempSpan.textContent = 'M';
        document.body.appendChild(tempSpan);

        const lineHeight = tempSpan.offsetHeight;
        document.body.removeChild(tempSpan);

        const fullHeight = pre.scrollHeight;
        const collapsedHeight = Math.ceil(lineHeight * maxLines);

        if (fullHeight <= collapsedHeight + 10) {
          return;
        }

        container.style.maxHeight = collapsedHeight + 'px';
        container.classList.add('collapsed');

        const copyBtn = document.createElement('button');
        copyBtn.className = 'copy-button';
        copyBtn.innerHTML = '&#128203;';
        copyBtn.title = 'Copy code';
        container.appendChild(copyBtn);

        copyBtn.addEventListener('click', (e) => {
          e.preventDefault();
          e.stopPropagation();
          const codeText = pre.innerText;
          navigator.clipboard.writeText(codeText).then(() => {
            copyBtn.textContent = '✔';
            setTimeout(() => { copyBtn.innerHTML = '&#128203;'; }, 1000);
          }).catch(err => {
            console.error('Could not copy to clipboard:', err);
          });
        });

        const btn = document.createElement('button');
        btn.className = 'toggle-button';
        btn.textContent = '+';
        btn.title = 'Expand/collapse code';
        container.appendChild(btn);

        const overlay = document.createElement('div');
        overlay.className = 'fade-overlay';
        container.appendChild(overlay);

        const ell = document.createElement('div');
        ell.className = 'ellipsis';
        ell.textContent = '...';
        container.appendChild(ell);

        btn.addEventListener('click', (e) => {
          e.preventDefault();
          e.stopPropagation();

          const isCollapsed = container.classList.contains('collapsed');

          if (isCollapsed) {
            container.style.maxHeight = fullHeight + 20 + 'px';
            container.classList.remove('collapsed');
            container.classList.add('expanded');
            btn.textContent = '−';
          } else {
            container.style.maxHeight = collapsedHeight + 'px';
            container.classList.add('collapsed');
            container.classList.remove('expanded');
            btn.textContent = '+';
          }
        });
      });
    }, 100);
  }

  if (document.readyState === 'loading') {
    document.addEventListener('DOMContentLoaded', initCollapsibles);
  } else {
    initCollapsibles();
  }

  window.addEventListener('load', initCollapsibles);
})();"#;

/// Wraps each `<pre>` with more than `max_lines` non-blank lines in a
/// collapsible container, injecting the supporting CSS/JS once. Code blocks
/// already wrapped, and mermaid diagram blocks, are skipped.
///
/// Returns the number of blocks wrapped.
pub fn wrap_long_code_blocks(document: &Document, max_lines: usize) -> usize {
    let already_processed =
        !dom::collect_elements(&document.root, |elem| elem.attr("id") == Some(CSS_ID)).is_empty();
    if !already_processed {
        let head = dom::ensure_head(document);

        let style = dom::new_element("style");
        if let Node::Element(ref mut elem) = *style.borrow_mut() {
            elem.set_attr("id", CSS_ID);
        }
        dom::append_child(&style, dom::new_text(COLLAPSIBLE_CSS));
        dom::append_child(&head, style);

        let script = dom::new_element("script");
        dom::append_child(&script, dom::new_text(COLLAPSIBLE_JS));
        dom::append_child(&head, script);
    }

    let mut wrapped = 0;
    for pre in dom::collect_elements(&document.root, |elem| elem.tag == "pre") {
        if dom::ancestor_matches(&pre, |elem| elem.has_class("collapsible-container")) {
            continue;
        }
        if dom::ancestor_matches(&pre, |elem| {
            elem.tag == "div" && (elem.has_class("mermaid") || elem.has_class("language-mermaid"))
        }) {
            continue;
        }

        let text = dom::text_content(&pre);
        let lines = text.lines().filter(|line| !line.trim().is_empty()).count();
        if lines <= max_lines {
            continue;
        }

        let wrapper = dom::new_element("div");
        {
            let mut node = wrapper.borrow_mut();
            if let Node::Element(ref mut elem) = *node {
                elem.set_attr("class", "collapsible-container");
                elem.set_attr("data-max-lines", &max_lines.to_string());
                // Carry the block's own styling over to the wrapper.
                let pre_style = match *pre.borrow() {
                    Node::Element(ref pre_elem) => pre_elem.attr("style").map(str::to_string),
                    _ => None,
                };
                if let Some(style_attr) = pre_style {
                    elem.set_attr("style", &style_attr);
                }
            }
        }
        if dom::wrap_element(&pre, wrapper) {
            wrapped += 1;
        }
    }

    info!("wrapped {} code blocks longer than {} lines", wrapped, max_lines);
    wrapped
}
