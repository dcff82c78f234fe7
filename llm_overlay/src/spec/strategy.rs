//! Declared per-field merge policies for the document schema.
//!
//! Strategic-merge behaviour is spelled out here as data rather than derived
//! from field metadata by reflection, keeping the merge engine's semantics
//! independently testable. Fields not listed fall back to structural
//! defaults: objects merge per key, everything else replaces.

/// Merge policy for one document node.
#[derive(Debug)]
pub enum Strategy {
    /// Override value replaces the base value.
    Scalar,
    /// Merge object fields pairwise using the declared field policies.
    Object(&'static [Field]),
    /// Match list elements on the named key; merge matched elements
    /// element-wise, append unmatched override elements after the preserved
    /// base order.
    KeyedList {
        /// Field each element is addressed by.
        key: &'static str,
        /// Policy applied when two elements share a key.
        element: &'static Strategy,
    },
    /// A non-empty override list replaces the base list wholesale; an empty
    /// override list is a no-op.
    ReplaceList,
    /// String-keyed entries merged per key. An override key with an explicit
    /// empty value still counts as set and overwrites.
    Map(&'static Strategy),
}

/// A declared field policy inside an [`Strategy::Object`].
#[derive(Debug)]
pub struct Field {
    /// Wire (camelCase) name of the field.
    pub name: &'static str,
    /// Policy applied to the field's value.
    pub strategy: &'static Strategy,
}

impl Strategy {
    /// Look up the declared policy for `name`, if any.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static Strategy> {
        match self {
            Self::Object(fields) => fields.iter().find(|f| f.name == name).map(|f| f.strategy),
            _ => None,
        }
    }
}

/// Generic object merge with no declared fields.
pub static OBJECT: Strategy = Strategy::Object(&[]);

static QUANTITIES: Strategy = Strategy::Map(&Strategy::Scalar);

static RESOURCES: Strategy = Strategy::Object(&[
    Field {
        name: "requests",
        strategy: &QUANTITIES,
    },
    Field {
        name: "limits",
        strategy: &QUANTITIES,
    },
]);

static CONTAINER: Strategy = Strategy::Object(&[
    Field {
        name: "env",
        strategy: &Strategy::KeyedList {
            key: "name",
            element: &OBJECT,
        },
    },
    Field {
        name: "ports",
        strategy: &Strategy::KeyedList {
            key: "containerPort",
            element: &OBJECT,
        },
    },
    Field {
        name: "volumeMounts",
        strategy: &Strategy::KeyedList {
            key: "mountPath",
            element: &OBJECT,
        },
    },
    Field {
        name: "command",
        strategy: &Strategy::ReplaceList,
    },
    Field {
        name: "args",
        strategy: &Strategy::ReplaceList,
    },
    Field {
        name: "resources",
        strategy: &RESOURCES,
    },
]);

static CONTAINERS: Strategy = Strategy::KeyedList {
    key: "name",
    element: &CONTAINER,
};

static POD: Strategy = Strategy::Object(&[
    Field {
        name: "containers",
        strategy: &CONTAINERS,
    },
    Field {
        name: "initContainers",
        strategy: &CONTAINERS,
    },
    Field {
        name: "volumes",
        strategy: &Strategy::KeyedList {
            key: "name",
            element: &OBJECT,
        },
    },
    Field {
        name: "tolerations",
        strategy: &Strategy::ReplaceList,
    },
    Field {
        name: "nodeSelector",
        strategy: &Strategy::Map(&Strategy::Scalar),
    },
]);

static WORKLOAD: Strategy = Strategy::Object(&[
    Field {
        name: "template",
        strategy: &POD,
    },
    Field {
        name: "worker",
        strategy: &POD,
    },
]);

static MODEL: Strategy = Strategy::Object(&[Field {
    name: "storage",
    strategy: &Strategy::Object(&[Field {
        name: "parameters",
        strategy: &Strategy::Map(&Strategy::Scalar),
    }]),
}]);

static HTTP_ROUTE: Strategy = Strategy::Object(&[
    Field {
        name: "refs",
        strategy: &Strategy::ReplaceList,
    },
    Field {
        name: "spec",
        strategy: &Strategy::Object(&[
            Field {
                name: "parentRefs",
                strategy: &Strategy::ReplaceList,
            },
            Field {
                name: "rules",
                strategy: &Strategy::ReplaceList,
            },
        ]),
    },
]);

static SCHEDULER: Strategy = Strategy::Object(&[
    Field {
        name: "template",
        strategy: &POD,
    },
    Field {
        name: "pool",
        strategy: &Strategy::Object(&[Field {
            name: "spec",
            strategy: &Strategy::Object(&[Field {
                name: "selector",
                strategy: &Strategy::Map(&Strategy::Scalar),
            }]),
        }]),
    },
]);

static ROUTER: Strategy = Strategy::Object(&[
    Field {
        name: "route",
        strategy: &Strategy::Object(&[Field {
            name: "http",
            strategy: &HTTP_ROUTE,
        }]),
    },
    Field {
        name: "gateway",
        strategy: &Strategy::Object(&[Field {
            name: "refs",
            strategy: &Strategy::ReplaceList,
        }]),
    },
    Field {
        name: "scheduler",
        strategy: &SCHEDULER,
    },
]);

/// Root policy for [`super::ServiceSpec`] documents. The workload fields sit
/// at the top level because the workload spec is flattened on the wire.
pub static SERVICE_SPEC: Strategy = Strategy::Object(&[
    Field {
        name: "model",
        strategy: &MODEL,
    },
    Field {
        name: "template",
        strategy: &POD,
    },
    Field {
        name: "worker",
        strategy: &POD,
    },
    Field {
        name: "prefill",
        strategy: &WORKLOAD,
    },
    Field {
        name: "router",
        strategy: &ROUTER,
    },
    Field {
        name: "baseRefs",
        strategy: &Strategy::ReplaceList,
    },
]);
