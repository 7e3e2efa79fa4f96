//! Embedded es-MX vocabulary for fake names, companies and addresses.

use super::rng::XorShift64;
use std::collections::HashSet;

/// Attempts before a unique draw gives up
const MAX_UNIQUE_ATTEMPTS: usize = 1000;

const FIRST_NAMES: &[&str] = &[
    "Alejandro", "Alicia", "Andrés", "Ana", "Antonio", "Beatriz", "Carlos", "Carmen",
    "Claudia", "Daniel", "Diana", "Eduardo", "Elena", "Emilio", "Esperanza", "Fernando",
    "Gabriela", "Guadalupe", "Héctor", "Irene", "Jorge", "José", "Josefina", "Juan",
    "Julia", "Laura", "Leticia", "Luis", "Manuel", "Marco", "María", "Mariana",
    "Miguel", "Mónica", "Natalia", "Óscar", "Patricia", "Pedro", "Rafael", "Raúl",
    "Ricardo", "Rocío", "Rosa", "Salvador", "Sergio", "Silvia", "Sofía", "Teresa",
    "Valeria", "Víctor", "Ximena", "Yolanda",
];

const LAST_NAMES: &[&str] = &[
    "Aguilar", "Álvarez", "Castillo", "Castro", "Cervantes", "Chávez", "Cruz", "Delgado",
    "Díaz", "Domínguez", "Espinoza", "Estrada", "Flores", "García", "Gómez", "González",
    "Guerrero", "Gutiérrez", "Hernández", "Herrera", "Jiménez", "López", "Luna", "Martínez",
    "Medina", "Mendoza", "Morales", "Moreno", "Muñoz", "Navarro", "Ortega", "Ortiz",
    "Pérez", "Ramírez", "Ramos", "Reyes", "Ríos", "Rivera", "Rodríguez", "Romero",
    "Rosales", "Ruiz", "Salazar", "Sánchez", "Soto", "Torres", "Valdez", "Vargas",
    "Vázquez", "Vega",
];

const COMPANY_SUFFIXES: &[&str] = &["S.A.", "S.A. de C.V.", "S.C.", "y Asociados", "e Hijos", "Grupo"];

const STREET_PREFIXES: &[&str] = &["Calle", "Avenida", "Boulevard", "Calzada", "Privada", "Callejón"];

const STREET_NAMES: &[&str] = &[
    "Reforma", "Juárez", "Hidalgo", "Morelos", "Insurgentes", "Madero", "Zaragoza",
    "Allende", "Independencia", "Revolución", "Constitución", "Matamoros", "Guerrero",
    "Aldama", "Vallarta", "Chapultepec",
];

const NEIGHBORHOODS: &[&str] = &[
    "Centro", "Del Valle", "Roma Norte", "Condesa", "Polanco", "Narvarte", "Coyoacán",
    "San Ángel", "Lindavista", "Santa Fe", "Providencia", "Las Águilas",
];

const CITIES: &[(&str, &str)] = &[
    ("Ciudad de México", "CDMX"),
    ("Guadalajara", "Jal."),
    ("Monterrey", "N.L."),
    ("Puebla", "Pue."),
    ("Querétaro", "Qro."),
    ("Mérida", "Yuc."),
    ("Toluca", "Méx."),
    ("León", "Gto."),
    ("Oaxaca", "Oax."),
    ("Morelia", "Mich."),
];

const EMAIL_DOMAINS: &[&str] = &["gmail.com", "hotmail.com", "yahoo.com", "example.org", "example.com"];

const WORDS: &[&str] = &[
    "hogar", "jardín", "cocina", "deportes", "juguetes", "música", "libros", "papelería",
    "ropa", "calzado", "belleza", "salud", "mascotas", "electrónica", "cómputo", "telefonía",
    "ferretería", "automotriz", "bebés", "farmacia", "abarrotes", "bebidas", "panadería",
    "lácteos", "carnes", "frutas", "verduras", "limpieza", "oficina", "regalos", "viaje",
    "camping", "iluminación", "decoración", "muebles", "blancos", "joyería", "relojes",
    "fotografía", "videojuegos", "arte", "manualidades", "fiesta", "herramientas",
    "pintura", "plomería", "electricidad", "seguridad", "ciclismo", "natación",
];

const PHRASE_NOUNS: &[&str] = &[
    "Adaptador", "Algoritmo", "Aplicación", "Arquitectura", "Base de datos", "Capacidad",
    "Conjunto", "Estrategia", "Extranet", "Firmware", "Frontera", "Función", "Hardware",
    "Interfaz", "Intranet", "Jerarquía", "Marco de trabajo", "Matriz", "Metodología",
    "Modelo", "Monitorizar", "Paradigma", "Portal", "Proceso", "Producto", "Protocolo",
    "Proyección", "Red", "Software", "Solución",
];

const PHRASE_ADJECTIVES: &[&str] = &[
    "adaptable", "avanzado", "centralizado", "compartible", "configurable", "descentralizado",
    "digitalizado", "distribuido", "diverso", "ergonómico", "exclusivo", "expandido",
    "extendido", "fundamental", "horizontal", "implementado", "innovador", "integrado",
    "mejorado", "multicanal", "opcional", "optimizado", "organizado", "personalizable",
    "polivalente", "progresivo", "reducido", "robusto", "sincronizado", "virtual",
];

const PHRASE_QUALIFIERS: &[&str] = &[
    "24 horas", "24/7", "a medida", "actitud", "alto nivel", "analizada", "bidireccional",
    "clientes", "con valor añadido", "contingencia", "de apoyo", "de primera mano",
    "dedicada", "en red", "estable", "global", "heurística", "incremental", "interactiva",
    "local", "modular", "motivadora", "multimedia", "neutral", "orientada a objetos",
    "proactiva", "radical", "seguridad", "sistemática", "tangible",
];

fn pick(rng: &mut XorShift64, items: &[&'static str]) -> &'static str {
    rng.choose(items).copied().unwrap_or_default()
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lower-case ASCII form for email local parts and domains
fn ascii_fold(text: &str) -> String {
    text.chars()
        .filter_map(|c| {
            let folded = match c {
                'á' | 'Á' => 'a',
                'é' | 'É' => 'e',
                'í' | 'Í' => 'i',
                'ó' | 'Ó' => 'o',
                'ú' | 'Ú' | 'ü' | 'Ü' => 'u',
                'ñ' | 'Ñ' => 'n',
                c if c.is_ascii_alphanumeric() => c.to_ascii_lowercase(),
                _ => return None,
            };
            Some(folded)
        })
        .collect()
}

/// Fake-data source over the embedded vocabulary.
pub struct Faker<'a> {
    rng: &'a mut XorShift64,
}

impl<'a> Faker<'a> {
    pub fn new(rng: &'a mut XorShift64) -> Self {
        Self { rng }
    }

    pub fn rng(&mut self) -> &mut XorShift64 {
        &mut *self.rng
    }

    pub fn first_name(&mut self) -> String {
        pick(self.rng, FIRST_NAMES).to_string()
    }

    pub fn last_name(&mut self) -> String {
        pick(self.rng, LAST_NAMES).to_string()
    }

    /// Single title-cased dictionary word
    pub fn word(&mut self) -> String {
        title_case(pick(self.rng, WORDS))
    }

    pub fn catch_phrase(&mut self) -> String {
        format!(
            "{} {} {}",
            pick(self.rng, PHRASE_NOUNS),
            pick(self.rng, PHRASE_ADJECTIVES),
            pick(self.rng, PHRASE_QUALIFIERS)
        )
    }

    pub fn company(&mut self) -> String {
        match self.rng.below(3) {
            0 => format!("{} {}", pick(self.rng, LAST_NAMES), pick(self.rng, COMPANY_SUFFIXES)),
            1 => format!("{}-{}", pick(self.rng, LAST_NAMES), pick(self.rng, LAST_NAMES)),
            _ => format!(
                "{}, {} y {}",
                pick(self.rng, LAST_NAMES),
                pick(self.rng, LAST_NAMES),
                pick(self.rng, LAST_NAMES)
            ),
        }
    }

    /// Multi-line postal address (street / neighborhood / city line)
    pub fn address(&mut self) -> String {
        let (city, state) = CITIES[self.rng.below(CITIES.len())];
        let number = self.rng.range_inclusive(1, 999);
        let postal_code = self.rng.range_inclusive(1000, 99999);
        format!(
            "{} {} {}\n{}\n{}, {} {:05}",
            pick(self.rng, STREET_PREFIXES),
            pick(self.rng, STREET_NAMES),
            number,
            pick(self.rng, NEIGHBORHOODS),
            city,
            state,
            postal_code
        )
    }

    pub fn email(&mut self, first_name: &str, last_name: &str) -> String {
        let suffix = self.rng.range_inclusive(1, 9999);
        format!(
            "{}.{}{}@{}",
            ascii_fold(first_name),
            ascii_fold(last_name),
            suffix,
            pick(self.rng, EMAIL_DOMAINS)
        )
    }

    /// Draw from `source` until a value not in `seen` appears.
    pub fn unique<F>(&mut self, seen: &mut HashSet<String>, mut source: F) -> Option<String>
    where
        F: FnMut(&mut Self) -> String,
    {
        for _ in 0..MAX_UNIQUE_ATTEMPTS {
            let candidate = source(&mut *self);
            if seen.insert(candidate.clone()) {
                return Some(candidate);
            }
        }
        None
    }
}

/// Number of distinct words `Faker::word` can produce
pub fn word_capacity() -> usize {
    WORDS.len()
}

/// Number of distinct phrases `Faker::catch_phrase` can produce
pub fn phrase_capacity() -> usize {
    PHRASE_NOUNS.len() * PHRASE_ADJECTIVES.len() * PHRASE_QUALIFIERS.len()
}

/// Number of distinct names `Faker::company` can produce
pub fn company_capacity() -> usize {
    let n = LAST_NAMES.len();
    n * COMPANY_SUFFIXES.len() + n * n + n * n * n
}
