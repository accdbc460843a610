//! # Política de Caché por Ruta
//! src/cache/policy.rs
//!
//! Función pura `path → CacheDirective`. La tabla se arma una sola vez al
//! arrancar (desde [`Config`]) y después sólo se lee, así que se comparte
//! entre threads con un `Arc` sin locks.
//!
//! ```text
//! /jobs          → max-age=600   (listado que cambia seguido)
//! (cualquier otra) → max-age=3600
//! ```

use crate::config::Config;

/// Cómo se compara una regla contra el path normalizado
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathMatch {
    /// El path debe ser idéntico
    Exact(String),

    /// El path es el prefijo o cuelga de él (`/lessons`, `/lessons/3`);
    /// `/lessonsX` no coincide.
    Prefix(String),
}

impl PathMatch {
    fn matches(&self, path: &str) -> bool {
        match self {
            PathMatch::Exact(p) => path == p,
            PathMatch::Prefix(p) => {
                path == p || (path.starts_with(p.as_str()) && path[p.len()..].starts_with('/'))
            }
        }
    }
}

/// Resultado de consultar la política para un path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheDirective {
    /// Segundos de `max-age`
    pub max_age: u32,

    /// Si aplica revalidación condicional (`If-None-Match` → 304)
    pub revalidate: bool,
}

impl CacheDirective {
    pub fn new(max_age: u32) -> Self {
        Self {
            max_age,
            revalidate: true,
        }
    }

    /// Valor del header `cache-control`
    pub fn header_value(&self) -> String {
        format!("public, max-age={}", self.max_age)
    }
}

#[derive(Debug, Clone)]
struct CacheRule {
    matcher: PathMatch,
    directive: CacheDirective,
}

/// Tabla de reglas; la primera que coincide gana
#[derive(Debug, Clone)]
pub struct CachePolicy {
    default: CacheDirective,
    rules: Vec<CacheRule>,
}

impl CachePolicy {
    /// Lifetime para rutas sin regla (1 hora)
    pub const DEFAULT_MAX_AGE: u32 = 3600;

    /// Lifetime del listado de jobs (10 minutos)
    pub const JOBS_MAX_AGE: u32 = 600;

    /// Política vacía: todo path usa `default_max_age`
    pub fn new(default_max_age: u32) -> Self {
        Self {
            default: CacheDirective::new(default_max_age),
            rules: Vec::new(),
        }
    }

    /// Agrega una regla al final de la tabla
    pub fn with_rule(mut self, matcher: PathMatch, directive: CacheDirective) -> Self {
        self.rules.push(CacheRule { matcher, directive });
        self
    }

    /// Construye la tabla de producción a partir de la configuración
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.default_max_age).with_rule(
            PathMatch::Exact("/jobs".to_string()),
            CacheDirective::new(config.jobs_max_age),
        )
    }

    /// Directiva para un path ya normalizado
    pub fn lookup(&self, path: &str) -> CacheDirective {
        self.rules
            .iter()
            .find(|rule| rule.matcher.matches(path))
            .map(|rule| rule.directive)
            .unwrap_or(self.default)
    }

    /// Atajo: sólo el `max-age`
    pub fn max_age(&self, path: &str) -> u32 {
        self.lookup(path).max_age
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_AGE).with_rule(
            PathMatch::Exact("/jobs".to_string()),
            CacheDirective::new(Self::JOBS_MAX_AGE),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let policy = CachePolicy::default();

        assert_eq!(policy.max_age("/jobs"), 600);
        assert_eq!(policy.max_age("/"), 3600);
        assert_eq!(policy.max_age("/unknown"), 3600);
    }

    #[test]
    fn test_short_lived_path_never_exceeds_bound() {
        let policy = CachePolicy::default();

        for _ in 0..10 {
            assert!(policy.max_age("/jobs") <= CachePolicy::JOBS_MAX_AGE);
        }
    }

    #[test]
    fn test_exact_rule_does_not_match_children() {
        let policy = CachePolicy::default();

        assert_eq!(policy.max_age("/jobs/123"), CachePolicy::DEFAULT_MAX_AGE);
        assert_eq!(policy.max_age("/jobsx"), CachePolicy::DEFAULT_MAX_AGE);
    }

    #[test]
    fn test_prefix_rule_matches_segments_only() {
        let policy = CachePolicy::new(3600)
            .with_rule(PathMatch::Prefix("/lessons".to_string()), CacheDirective::new(120));

        assert_eq!(policy.max_age("/lessons"), 120);
        assert_eq!(policy.max_age("/lessons/7"), 120);
        assert_eq!(policy.max_age("/lessonsx"), 3600);
    }

    #[test]
    fn test_first_rule_wins() {
        let policy = CachePolicy::new(3600)
            .with_rule(PathMatch::Exact("/daily-word".to_string()), CacheDirective::new(600))
            .with_rule(PathMatch::Prefix("/daily-word".to_string()), CacheDirective::new(60));

        assert_eq!(policy.max_age("/daily-word"), 600);
        assert_eq!(policy.max_age("/daily-word/today"), 60);
    }

    #[test]
    fn test_revalidation_flag() {
        let policy = CachePolicy::new(3600).with_rule(
            PathMatch::Exact("/static".to_string()),
            CacheDirective {
                max_age: 86_400,
                revalidate: false,
            },
        );

        assert!(!policy.lookup("/static").revalidate);
        assert!(policy.lookup("/jobs").revalidate);
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.default_max_age = 7200;
        config.jobs_max_age = 30;

        let policy = CachePolicy::from_config(&config);
        assert_eq!(policy.max_age("/jobs"), 30);
        assert_eq!(policy.max_age("/other"), 7200);
    }

    #[test]
    fn test_header_value() {
        assert_eq!(CacheDirective::new(600).header_value(), "public, max-age=600");
    }
}
