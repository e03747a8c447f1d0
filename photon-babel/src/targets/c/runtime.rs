//! Embedded C list runtime
//!
//!     One growable list type per element type (`list_int`, `list_float`, `list_str`,
//!     `list_bool`). Reads and writes wrap negative indices against the current length and
//!     abort with an IndexError when the index is still out of range. Each instantiation is
//!     wrapped in an include guard so that inlined modules can carry their own copy.

use crate::backend::Lines;
use crate::types::ValueType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ListKind {
    Int,
    Float,
    Str,
    Bool,
}

impl ListKind {
    pub fn of(element: &ValueType) -> Option<Self> {
        match element {
            ValueType::Int => Some(ListKind::Int),
            ValueType::Float => Some(ListKind::Float),
            ValueType::Str => Some(ListKind::Str),
            ValueType::Bool => Some(ListKind::Bool),
            _ => None,
        }
    }

    /// C type name of the list (`list_int`).
    pub fn name(&self) -> &'static str {
        match self {
            ListKind::Int => "list_int",
            ListKind::Float => "list_float",
            ListKind::Str => "list_str",
            ListKind::Bool => "list_bool",
        }
    }

    /// C type of one element.
    pub fn element(&self) -> &'static str {
        match self {
            ListKind::Int => "int",
            ListKind::Float => "double",
            ListKind::Str => "char*",
            ListKind::Bool => "bool",
        }
    }

    pub fn source(&self) -> Lines {
        let guard = format!("PHOTON_{}", self.name().to_uppercase());
        LIST_TEMPLATE
            .replace("{guard}", &guard)
            .replace("{list}", self.name())
            .replace("{elem}", self.element())
            .lines()
            .map(str::to_string)
            .collect()
    }
}

const LIST_TEMPLATE: &str = r#"#ifndef {guard}
#define {guard}
typedef struct {
    int len;
    int size;
    {elem}* values;
} {list};

{list}* {list}_new(void) {
    {list}* list = malloc(sizeof({list}));
    list->len = 0;
    list->size = 4;
    list->values = malloc(sizeof({elem}) * list->size);
    return list;
}

void {list}_append({list}* list, {elem} value) {
    if (list->len == list->size) {
        list->size *= 2;
        list->values = realloc(list->values, sizeof({elem}) * list->size);
    }
    list->values[list->len++] = value;
}

{list}* {list}_from({elem}* values, int len) {
    {list}* list = {list}_new();
    for (int i = 0; i < len; i++) {
        {list}_append(list, values[i]);
    }
    return list;
}

int {list}_index({list}* list, int index) {
    int i = index < 0 ? list->len + index : index;
    if (i < 0 || i >= list->len) {
        printf("IndexError: The array has %d elements, but you required the %d index\n", list->len, index);
        exit(-1);
    }
    return i;
}

{elem} {list}_get({list}* list, int index) {
    return list->values[{list}_index(list, index)];
}

void {list}_set({list}* list, int index, {elem} value) {
    list->values[{list}_index(list, index)] = value;
}
#endif"#;
