// src/noyau/complexe.rs
//
// Arithmétique complexe f64 (branches principales).
// - puissance : exposant entier exact, réel polaire, complexe via exp(w·ln z)
// - gamma     : Lanczos (g = 7) + réflexion pour Re(z) < 1/2, et sa version log
// - polygamma : récurrence vers Re(z) grand + développement asymptotique
// - zeta      : série de Hasse (Re ≥ 0) + équation fonctionnelle (Re < 0)
// - bornage   : sentinelle finie pour le buffer de sortie
//
// Les branches sont celles de num-complex : arg ∈ (-π, π], coupure sur ℝ⁻.

use num_complex::Complex64;
use num_traits::{One, Zero};
use std::f64::consts::PI;

/// Borne finie qui remplace ±inf / NaN (et tout ce qui dépasse) dans la sortie.
pub const SENTINELLE: f64 = 1e9;

/// Au-delà, l’exposant entier repasse en forme polaire (évite une boucle longue).
const EXPOSANT_ENTIER_MAX: f64 = 1024.0;

/// Nombre de termes de la série de zeta (côté Re(s) ≥ 0).
const TERMES_ZETA: usize = 40;

/// zetac(s, n) : nombre de termes demandé ramené à cette borne (coût quadratique).
pub const TERMES_ZETA_MAX: usize = 200;

/// polygamma(z, n) : ordre ramené à cette borne.
pub const ORDRE_POLYGAMMA_MAX: u32 = 255;

/// Décalages z -> z + 1 au-delà desquels polygamma rend un point non fini.
const DECALAGES_MAX: f64 = 10_000.0;

/// B_2, B_4, ..., B_14 (nombres de Bernoulli).
const BERNOULLI: [f64; 7] = [
    1.0 / 6.0,
    -1.0 / 30.0,
    1.0 / 42.0,
    -1.0 / 30.0,
    5.0 / 66.0,
    -691.0 / 2730.0,
    7.0 / 6.0,
];

const LANCZOS_G: f64 = 7.0;
const LANCZOS_P: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

/// Ce qui a dû être corrigé sur un point de la grille.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Singularite {
    /// Une composante était NaN ou infinie.
    NonFini,
    /// Composantes finies mais hors de [-SENTINELLE, SENTINELLE].
    HorsBornes,
}

#[inline]
pub fn reel(x: f64) -> Complex64 {
    Complex64::new(x, 0.0)
}

/// Borne une composante : NaN -> +S, ±inf -> ±S, sinon clamp dans [-S, S].
#[inline]
pub fn borner(x: f64) -> f64 {
    if x.is_nan() {
        SENTINELLE
    } else {
        x.clamp(-SENTINELLE, SENTINELLE)
    }
}

/// Borne les deux composantes et signale la correction éventuelle.
pub fn borner_complexe(c: Complex64) -> (Complex64, Option<Singularite>) {
    let singularite = if !c.re.is_finite() || !c.im.is_finite() {
        Some(Singularite::NonFini)
    } else if c.re.abs() > SENTINELLE || c.im.abs() > SENTINELLE {
        Some(Singularite::HorsBornes)
    } else {
        None
    };

    match singularite {
        None => (c, None),
        Some(_) => (Complex64::new(borner(c.re), borner(c.im)), singularite),
    }
}

/// arg(c) / 2π ramené dans [0, 1).
pub fn argument_normalise(c: Complex64) -> f64 {
    let mut t = c.arg() / (2.0 * PI);
    if t < 0.0 {
        t += 1.0;
    }
    // -ε + 1 peut s’arrondir à 1.0, en f64 ou à l’écriture en f32
    if t as f32 >= 1.0 {
        t = 0.0;
    }
    t
}

/// Division : 0/0 et x/0 restent non finis (le bornage s’en charge).
#[inline]
pub fn diviser(a: Complex64, b: Complex64) -> Complex64 {
    if b.is_zero() {
        // num-complex donnerait NaN partout ; on garde la direction de a.
        return Complex64::new(a.re / 0.0, a.im / 0.0);
    }
    a / b
}

/// a^b, branche principale.
pub fn puissance(base: Complex64, exposant: Complex64) -> Complex64 {
    if exposant.im == 0.0 {
        let n = exposant.re;
        if n.fract() == 0.0 && n.abs() <= EXPOSANT_ENTIER_MAX {
            return puissance_entiere(base, n as i32);
        }
        return base.powf(n);
    }
    if base.is_zero() {
        return Complex64::zero();
    }
    (exposant * base.ln()).exp()
}

/// Exponentiation rapide exacte (0^0 = 1).
fn puissance_entiere(base: Complex64, n: i32) -> Complex64 {
    let mut e = n.unsigned_abs();
    let mut acc = Complex64::one();
    let mut b = base;

    while e > 0 {
        if e & 1 == 1 {
            acc *= b;
        }
        e >>= 1;
        if e > 0 {
            b *= b;
        }
    }

    if n < 0 {
        diviser(Complex64::one(), acc)
    } else {
        acc
    }
}

/// log de base |b| : ln(z) / ln|b|. Seul le module de la base compte.
pub fn log_base(z: Complex64, b: Complex64) -> Complex64 {
    diviser(z.ln(), reel(b.norm().ln()))
}

/// Γ(z) par Lanczos ; pôles aux entiers ≤ 0 (résultat non fini).
pub fn gamma(z: Complex64) -> Complex64 {
    if z.re < 0.5 {
        // Γ(z) Γ(1-z) = π / sin(πz)
        let s = (z * PI).sin();
        return diviser(reel(PI), s * gamma(Complex64::one() - z));
    }

    let z = z - 1.0;
    let t = z + (LANCZOS_G + 0.5);
    (2.0 * PI).sqrt() * puissance(t, z + 0.5) * (-t).exp() * serie_lanczos(z)
}

/// Somme de Lanczos pour z déjà décalé de -1.
fn serie_lanczos(z: Complex64) -> Complex64 {
    let mut x = reel(LANCZOS_P[0]);
    for (i, p) in LANCZOS_P.iter().enumerate().skip(1) {
        x += diviser(reel(*p), z + i as f64);
    }
    x
}

/// ln Γ(z), sans passer par Γ (pas de débordement pour Re(z) grand).
pub fn ln_gamma(z: Complex64) -> Complex64 {
    if z.re < 0.5 {
        // ln Γ(z) = ln π - ln sin(πz) - ln Γ(1-z)
        return reel(PI.ln()) - (z * PI).sin().ln() - ln_gamma(Complex64::one() - z);
    }

    let z = z - 1.0;
    let t = z + (LANCZOS_G + 0.5);
    reel(0.5 * (2.0 * PI).ln()) + (z + 0.5) * t.ln() - t + serie_lanczos(z).ln()
}

fn factorielle(n: u32) -> f64 {
    (1..=n).map(f64::from).product()
}

/// ψ⁽ⁿ⁾(z), dérivée n-ième de la digamma (n = 0 : digamma).
///
/// ψ⁽ⁿ⁾(z) = ψ⁽ⁿ⁾(z + 1) - (-1)ⁿ n! / zⁿ⁺¹ ramène z vers Re(z) ≥ 10 + n,
/// où le développement asymptotique (Bernoulli jusqu’à B_14) suffit en f64.
/// Pôles aux entiers ≤ 0 : résultat non fini.
pub fn polygamma(z: Complex64, n: u32) -> Complex64 {
    if !z.re.is_finite() || !z.im.is_finite() {
        return Complex64::new(f64::NAN, f64::NAN);
    }

    let n = n.min(ORDRE_POLYGAMMA_MAX);
    let seuil = 10.0 + f64::from(n);
    if seuil - z.re > DECALAGES_MAX {
        return Complex64::new(f64::NAN, f64::NAN);
    }

    let signe = if n % 2 == 0 { 1.0 } else { -1.0 };
    let n_fact = factorielle(n);

    let mut z = z;
    let mut acc = Complex64::zero();
    while z.re < seuil {
        acc -= puissance_entiere(z, -(n as i32 + 1)) * (signe * n_fact);
        z += 1.0;
    }

    let inv = diviser(Complex64::one(), z);
    let inv2 = inv * inv;

    let asymptotique = if n == 0 {
        // ln z - 1/(2z) - Σ B_2k / (2k z^2k)
        let mut s = z.ln() - inv * 0.5;
        let mut p = Complex64::one();
        for (k, b) in BERNOULLI.iter().enumerate() {
            p *= inv2;
            s -= p * (b / (2 * (k + 1)) as f64);
        }
        s
    } else {
        // (-1)ⁿ⁺¹ [ (n-1)!/zⁿ + n!/(2zⁿ⁺¹) + Σ B_2k (2k+n-1)!/(2k)! / z^(2k+n) ]
        let base = puissance_entiere(inv, n as i32);
        let mut s = base * factorielle(n - 1) + base * inv * (n_fact / 2.0);
        let mut p = base;
        for (k, b) in BERNOULLI.iter().enumerate() {
            let deux_k = 2 * (k as u32 + 1);
            let rapport: f64 = (deux_k + 1..deux_k + n).map(f64::from).product();
            p *= inv2;
            s += p * (b * rapport);
        }
        s * -signe
    };

    acc + asymptotique
}

/// ψ(z) = Γ'(z) / Γ(z).
pub fn digamma(z: Complex64) -> Complex64 {
    polygamma(z, 0)
}

/// ζ(s) de Riemann ; pôle simple en s = 1.
pub fn zeta(s: Complex64) -> Complex64 {
    zeta_termes(s, TERMES_ZETA)
}

/// ζ(s) avec `termes` termes de la série (ramené à TERMES_ZETA_MAX).
pub fn zeta_termes(s: Complex64, termes: usize) -> Complex64 {
    if s == Complex64::one() {
        return reel(f64::INFINITY);
    }
    let termes = termes.min(TERMES_ZETA_MAX);

    if s.re < 0.0 {
        // ζ(s) = 2^s π^(s-1) sin(πs/2) Γ(1-s) ζ(1-s)
        let un_moins_s = Complex64::one() - s;
        return puissance(reel(2.0), s)
            * puissance(reel(PI), s - 1.0)
            * (s * (PI / 2.0)).sin()
            * gamma(un_moins_s)
            * zeta_termes(un_moins_s, termes);
    }

    // η(s) = Σ_n 2^-(n+1) Σ_k (-1)^k C(n,k) (k+1)^-s ; ζ = η / (1 - 2^(1-s))
    let puissances: Vec<Complex64> = (0..termes)
        .map(|k| puissance(reel((k + 1) as f64), -s))
        .collect();

    let mut eta = Complex64::zero();
    for n in 0..termes {
        let mut interne = Complex64::zero();
        let mut binome = 1.0_f64;
        for (k, p) in puissances.iter().enumerate().take(n + 1) {
            let signe = if k % 2 == 0 { 1.0 } else { -1.0 };
            interne += *p * (signe * binome);
            binome = binome * (n - k) as f64 / (k + 1) as f64;
        }
        eta += interne / 2f64.powi(n as i32 + 1);
    }

    diviser(eta, Complex64::one() - puissance(reel(2.0), Complex64::one() - s))
}
