//! Device intake catalog used to build believable demo repairs.
//!
//! Brands, models, flaws, and physical conditions mirror the options the
//! front-desk intake form offers.

/// One device category with its known brands, models, and typical flaws.
pub struct DeviceCatalog {
    /// Category name ("Celular", "Notebook", ...).
    pub kind: &'static str,
    /// Brand/model pairs offered by the intake form.
    pub models: &'static [(&'static str, &'static str)],
    /// Flaws commonly reported for this category.
    pub flaws: &'static [&'static str],
}

/// Every device category the intake form knows about.
pub const DEVICE_CATALOG: &[DeviceCatalog] = &[
    DeviceCatalog {
        kind: "Celular",
        models: &[
            ("Samsung", "Galaxy S21"),
            ("Samsung", "Galaxy A52"),
            ("Apple", "iPhone 12"),
            ("Xiaomi", "Redmi Note 10"),
            ("Motorola", "Moto G8"),
        ],
        flaws: &[
            "Diagnosticar por el tecnico",
            "No enciende",
            "Pantalla dañada",
            "No carga",
            "Batería se descarga rápido",
        ],
    },
    DeviceCatalog {
        kind: "Tablet",
        models: &[
            ("Samsung", "Galaxy Tab S7"),
            ("Apple", "iPad 9th Gen"),
            ("Lenovo", "Tab M10 Plus"),
        ],
        flaws: &[
            "Diagnosticar por el tecnico",
            "No enciende",
            "Pantalla táctil no responde",
            "Se reinicia solo",
        ],
    },
    DeviceCatalog {
        kind: "Notebook",
        models: &[
            ("Dell", "XPS 13 (9310)"),
            ("HP", "Pavilion 15"),
            ("Lenovo", "ThinkPad X1 Carbon (Gen 9)"),
            ("Apple", "MacBook Air (M1, 2020)"),
        ],
        flaws: &[
            "Diagnosticar por el tecnico",
            "No enciende",
            "Batería no carga",
            "Teclado no funciona",
        ],
    },
    DeviceCatalog {
        kind: "CPU",
        models: &[
            ("Dell", "Inspiron 3880"),
            ("HP", "OMEN 30L"),
            ("Lenovo", "IdeaCentre 5"),
        ],
        flaws: &[
            "Diagnosticar por el tecnico",
            "No enciende",
            "Pantalla azul",
            "Se calienta demasiado",
        ],
    },
    DeviceCatalog {
        kind: "Consola de video juego",
        models: &[
            ("Sony", "PlayStation 5"),
            ("Microsoft", "Xbox Series S"),
            ("Nintendo", "Switch OLED"),
        ],
        flaws: &[
            "Diagnosticar por el tecnico",
            "No enciende",
            "No lee los discos",
            "Se congela en el inicio",
        ],
    },
];

/// Cosmetic states the front desk records at intake.
pub const PHYSICAL_CONDITIONS: &[&str] = &[
    "Excelente",
    "Rayado",
    "Golpeado",
    "Pantalla rota",
    "Batería inflada",
    "Falta tornillo",
    "Humedad",
];

/// Post-intake status walks, each a legal sequence for the repair workflow
/// (no finish straight after waiting-for-parts, terminal states only last).
pub const STATUS_PATHS: &[&[&str]] = &[
    &[],
    &["En Revisión"],
    &["En Revisión", "Equipo Diagnosticado"],
    &["En Revisión", "Equipo Diagnosticado", "Esperando Aprobación del Cliente"],
    &["En Revisión", "Equipo Diagnosticado", "Esperando Repuesto"],
    &["En Revisión", "Equipo Diagnosticado", "Reparación en Progreso"],
    &[
        "En Revisión",
        "Equipo Diagnosticado",
        "Esperando Repuesto",
        "Reparación en Progreso",
        "Reparación Finalizada",
    ],
    &[
        "En Revisión",
        "Equipo Diagnosticado",
        "Reparación en Progreso",
        "Reparación Finalizada",
        "Equipo Listo para Retiro",
        "Equipo Retirado",
    ],
    &["En Revisión", "Equipo Diagnosticado", "Reparación Imposible de Realizar"],
    &["En Revisión", "Reparación Cancelada por el Cliente"],
];
