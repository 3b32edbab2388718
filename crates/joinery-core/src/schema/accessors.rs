use std_util::str;

/// Names of the instance methods an association exposes on its source
/// model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessors {
    pub get: String,
    pub set: String,
    pub create: String,

    // The following only exist on multi-row associations.
    pub add: Option<String>,
    pub add_multiple: Option<String>,
    pub remove: Option<String>,
    pub remove_multiple: Option<String>,
    pub has_single: Option<String>,
    pub has_all: Option<String>,
    pub count: Option<String>,
}

impl Accessors {
    pub(crate) fn single(alias: &str) -> Accessors {
        let name = str::upper_first(alias);
        Accessors {
            get: format!("get{name}"),
            set: format!("set{name}"),
            create: format!("create{name}"),
            add: None,
            add_multiple: None,
            remove: None,
            remove_multiple: None,
            has_single: None,
            has_all: None,
            count: None,
        }
    }

    pub(crate) fn multiple(alias: &str) -> Accessors {
        let plural = str::upper_first(alias);
        let singular = str::upper_first(&str::singularize(alias));
        Accessors {
            get: format!("get{plural}"),
            set: format!("set{plural}"),
            create: format!("create{singular}"),
            add: Some(format!("add{singular}")),
            add_multiple: Some(format!("add{plural}")),
            remove: Some(format!("remove{singular}")),
            remove_multiple: Some(format!("remove{plural}")),
            has_single: Some(format!("has{singular}")),
            has_all: Some(format!("has{plural}")),
            count: Some(format!("count{plural}")),
        }
    }
}
