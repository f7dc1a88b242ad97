use super::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SelectorAttrCondition {
    Exists { key: String },
    Eq { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SelectorPseudoClass {
    Checked,
    Disabled,
    Not(Box<SelectorStep>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SelectorStep {
    pub(crate) tag: Option<String>,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) attrs: Vec<SelectorAttrCondition>,
    pub(crate) pseudo_classes: Vec<SelectorPseudoClass>,
}

/// A parsed selector list: comma-separated groups of descendant chains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Selector {
    pub(crate) groups: Vec<Vec<SelectorStep>>,
}

impl Selector {
    pub(crate) fn parse(selector: &str) -> Result<Self> {
        let groups = split_selector_groups(selector)?;
        let mut parsed = Vec::with_capacity(groups.len());
        for group in groups {
            parsed.push(parse_selector_chain(&group)?);
        }
        Ok(Self { groups: parsed })
    }

    pub(crate) fn matches(&self, dom: &Dom, node_id: NodeId) -> bool {
        self.groups
            .iter()
            .any(|chain| matches_chain(dom, node_id, chain))
    }
}

/// All connected elements matching the selector, in document order.
pub(crate) fn query_all(dom: &Dom, selector: &str) -> Result<Vec<NodeId>> {
    let parsed = Selector::parse(selector)?;
    Ok(dom
        .elements_in_document_order()
        .into_iter()
        .filter(|node| parsed.matches(dom, *node))
        .collect())
}

pub(crate) fn query_first(dom: &Dom, selector: &str) -> Result<Option<NodeId>> {
    Ok(query_all(dom, selector)?.into_iter().next())
}

fn matches_chain(dom: &Dom, node_id: NodeId, chain: &[SelectorStep]) -> bool {
    let Some((last, rest)) = chain.split_last() else {
        return false;
    };
    if !matches_step(dom, node_id, last) {
        return false;
    }
    matches_ancestor_chain(dom, node_id, rest)
}

fn matches_ancestor_chain(dom: &Dom, node_id: NodeId, chain: &[SelectorStep]) -> bool {
    let Some((last, rest)) = chain.split_last() else {
        return true;
    };
    dom.ancestors(node_id).into_iter().any(|ancestor| {
        matches_step(dom, ancestor, last) && matches_ancestor_chain(dom, ancestor, rest)
    })
}

fn matches_step(dom: &Dom, node_id: NodeId, step: &SelectorStep) -> bool {
    let Some(element) = dom.element(node_id) else {
        return false;
    };

    if let Some(tag) = &step.tag {
        if !element.tag_name.eq_ignore_ascii_case(tag) {
            return false;
        }
    }

    if let Some(id) = &step.id {
        if element.attrs.get("id").map(String::as_str) != Some(id.as_str()) {
            return false;
        }
    }

    for class_name in &step.classes {
        if !dom.has_class(node_id, class_name) {
            return false;
        }
    }

    for attr in &step.attrs {
        let matched = match attr {
            SelectorAttrCondition::Exists { key } => element.attrs.contains_key(key),
            SelectorAttrCondition::Eq { key, value } => element
                .attrs
                .get(key)
                .is_some_and(|actual| actual.eq_ignore_ascii_case(value)),
        };
        if !matched {
            return false;
        }
    }

    for pseudo in &step.pseudo_classes {
        let matched = match pseudo {
            SelectorPseudoClass::Checked => element.checked,
            SelectorPseudoClass::Disabled => element.disabled,
            SelectorPseudoClass::Not(inner) => !matches_step(dom, node_id, inner),
        };
        if !matched {
            return false;
        }
    }

    true
}

fn parse_selector_chain(selector: &str) -> Result<Vec<SelectorStep>> {
    let selector = selector.trim();
    if selector.is_empty() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }

    let tokens = tokenize_selector(selector)?;
    let mut steps = Vec::new();
    for token in tokens {
        steps.push(parse_selector_step(&token)?);
    }

    if steps.is_empty() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }

    Ok(steps)
}

fn split_selector_groups(selector: &str) -> Result<Vec<String>> {
    let mut groups = Vec::new();
    let mut current = String::new();
    let mut bracket_depth = 0usize;
    let mut paren_depth = 0usize;

    for ch in selector.chars() {
        match ch {
            '[' => {
                bracket_depth += 1;
                current.push(ch);
            }
            ']' => {
                if bracket_depth == 0 {
                    return Err(Error::UnsupportedSelector(selector.into()));
                }
                bracket_depth -= 1;
                current.push(ch);
            }
            '(' => {
                paren_depth += 1;
                current.push(ch);
            }
            ')' => {
                if paren_depth == 0 {
                    return Err(Error::UnsupportedSelector(selector.into()));
                }
                paren_depth -= 1;
                current.push(ch);
            }
            ',' if bracket_depth == 0 && paren_depth == 0 => {
                let trimmed = current.trim();
                if trimmed.is_empty() {
                    return Err(Error::UnsupportedSelector(selector.into()));
                }
                groups.push(trimmed.to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    if bracket_depth != 0 || paren_depth != 0 {
        return Err(Error::UnsupportedSelector(selector.into()));
    }

    let trimmed = current.trim();
    if trimmed.is_empty() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }
    groups.push(trimmed.to_string());
    Ok(groups)
}

fn tokenize_selector(selector: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut bracket_depth = 0usize;
    let mut paren_depth = 0usize;

    for ch in selector.chars() {
        match ch {
            '[' => {
                bracket_depth += 1;
                current.push(ch);
            }
            ']' => {
                if bracket_depth == 0 {
                    return Err(Error::UnsupportedSelector(selector.into()));
                }
                bracket_depth -= 1;
                current.push(ch);
            }
            '(' => {
                paren_depth += 1;
                current.push(ch);
            }
            ')' => {
                if paren_depth == 0 {
                    return Err(Error::UnsupportedSelector(selector.into()));
                }
                paren_depth -= 1;
                current.push(ch);
            }
            ch if ch.is_ascii_whitespace() && bracket_depth == 0 && paren_depth == 0 => {
                if !current.trim().is_empty() {
                    tokens.push(current.trim().to_string());
                }
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    if bracket_depth != 0 || paren_depth != 0 {
        return Err(Error::UnsupportedSelector(selector.into()));
    }

    if !current.trim().is_empty() {
        tokens.push(current.trim().to_string());
    }

    Ok(tokens)
}

fn parse_selector_step(part: &str) -> Result<SelectorStep> {
    let part = part.trim();
    if part.is_empty() {
        return Err(Error::UnsupportedSelector(part.into()));
    }

    let bytes = part.as_bytes();
    let mut i = 0usize;
    let mut step = SelectorStep::default();

    while i < bytes.len() {
        match bytes[i] {
            b'#' => {
                i += 1;
                let Some((id, next)) = parse_selector_ident(part, i) else {
                    return Err(Error::UnsupportedSelector(part.into()));
                };
                if step.id.replace(id).is_some() {
                    return Err(Error::UnsupportedSelector(part.into()));
                }
                i = next;
            }
            b'.' => {
                i += 1;
                let Some((class_name, next)) = parse_selector_ident(part, i) else {
                    return Err(Error::UnsupportedSelector(part.into()));
                };
                step.classes.push(class_name);
                i = next;
            }
            b'[' => {
                let (attr, next) = parse_selector_attr_condition(part, i)?;
                step.attrs.push(attr);
                i = next;
            }
            b':' => {
                let (pseudo, next) = parse_selector_pseudo(part, i)?;
                step.pseudo_classes.push(pseudo);
                i = next;
            }
            _ => {
                if step.tag.is_some() || step.id.is_some() || !step.classes.is_empty() {
                    return Err(Error::UnsupportedSelector(part.into()));
                }
                let Some((tag, next)) = parse_selector_ident(part, i) else {
                    return Err(Error::UnsupportedSelector(part.into()));
                };
                step.tag = Some(tag);
                i = next;
            }
        }
    }

    if step.tag.is_none()
        && step.id.is_none()
        && step.classes.is_empty()
        && step.attrs.is_empty()
        && step.pseudo_classes.is_empty()
    {
        return Err(Error::UnsupportedSelector(part.into()));
    }
    Ok(step)
}

fn parse_selector_pseudo(part: &str, start: usize) -> Result<(SelectorPseudoClass, usize)> {
    if part.as_bytes().get(start) != Some(&b':') {
        return Err(Error::UnsupportedSelector(part.into()));
    }
    let start = start + 1;
    let tail = part
        .get(start..)
        .ok_or_else(|| Error::UnsupportedSelector(part.into()))?;

    for (name, pseudo) in [
        ("checked", SelectorPseudoClass::Checked),
        ("disabled", SelectorPseudoClass::Disabled),
    ] {
        if let Some(rest) = tail.strip_prefix(name) {
            if rest.is_empty() || is_selector_continuation(rest.as_bytes()[0]) {
                return Ok((pseudo, start + name.len()));
            }
        }
    }

    if let Some(rest) = tail.strip_prefix("not(") {
        let close_pos = rest
            .find(')')
            .ok_or_else(|| Error::UnsupportedSelector(part.into()))?;
        let body = rest[..close_pos].trim();
        if body.is_empty() {
            return Err(Error::UnsupportedSelector(part.into()));
        }
        let inner = parse_selector_step(body)?;
        let next = start + "not(".len() + close_pos + 1;
        return Ok((SelectorPseudoClass::Not(Box::new(inner)), next));
    }

    Err(Error::UnsupportedSelector(part.into()))
}

fn is_selector_continuation(next: u8) -> bool {
    matches!(next, b'.' | b'#' | b'[' | b':')
}

fn parse_selector_ident(src: &str, start: usize) -> Option<(String, usize)> {
    let bytes = src.as_bytes();
    if start >= bytes.len() || !is_selector_ident_char(bytes[start]) {
        return None;
    }
    let mut end = start + 1;
    while end < bytes.len() && is_selector_ident_char(bytes[end]) {
        end += 1;
    }
    Some((src.get(start..end)?.to_string(), end))
}

fn is_selector_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

fn parse_selector_attr_condition(
    src: &str,
    open_bracket: usize,
) -> Result<(SelectorAttrCondition, usize)> {
    let bytes = src.as_bytes();
    let mut i = open_bracket + 1;

    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }

    let key_start = i;
    while i < bytes.len() && is_selector_attr_name_char(bytes[i]) {
        i += 1;
    }
    if key_start == i {
        return Err(Error::UnsupportedSelector(src.into()));
    }
    let key = src
        .get(key_start..i)
        .ok_or_else(|| Error::UnsupportedSelector(src.into()))?
        .to_ascii_lowercase();

    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    if i >= bytes.len() {
        return Err(Error::UnsupportedSelector(src.into()));
    }

    if bytes[i] == b']' {
        return Ok((SelectorAttrCondition::Exists { key }, i + 1));
    }

    if bytes[i] != b'=' {
        return Err(Error::UnsupportedSelector(src.into()));
    }
    i += 1;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }

    let quote = match bytes.get(i) {
        Some(b'"') => Some(b'"'),
        Some(b'\'') => Some(b'\''),
        _ => None,
    };
    let value_start = if quote.is_some() { i + 1 } else { i };
    let mut j = value_start;
    match quote {
        Some(q) => {
            while j < bytes.len() && bytes[j] != q {
                j += 1;
            }
            if j >= bytes.len() {
                return Err(Error::UnsupportedSelector(src.into()));
            }
        }
        None => {
            while j < bytes.len() && bytes[j] != b']' && !bytes[j].is_ascii_whitespace() {
                j += 1;
            }
        }
    }
    let value = src
        .get(value_start..j)
        .ok_or_else(|| Error::UnsupportedSelector(src.into()))?
        .to_string();

    i = if quote.is_some() { j + 1 } else { j };
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    if i >= bytes.len() || bytes[i] != b']' {
        return Err(Error::UnsupportedSelector(src.into()));
    }

    Ok((SelectorAttrCondition::Eq { key, value }, i + 1))
}

fn is_selector_attr_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b':'
}
