/// Canonical grades and their labels, lowest first.
pub const NOTAS: [(i32, &str); 5] = [
    (2, "Muito abaixo do esperado"),
    (4, "Abaixo do esperado"),
    (6, "Dentro do esperado"),
    (8, "Acima do esperado"),
    (10, "Muito acima do esperado"),
];

/// Grade used whenever a value or label is not in the table.
pub const NOTA_NEUTRA: i32 = 6;

pub fn nota_para_texto(nota: i32) -> &'static str {
    NOTAS
        .iter()
        .find(|(value, _)| *value == nota)
        .map(|(_, label)| *label)
        .unwrap_or(NOTAS[2].1)
}

pub fn texto_para_nota(texto: &str) -> i32 {
    for (value, label) in NOTAS.iter() {
        if *label == texto {
            return *value;
        }
    }
    NOTA_NEUTRA
}

pub fn get_nota_border_color(nota: i32) -> &'static str {
    if nota >= 8 {
        "border-green-500"
    } else if nota == 6 {
        "border-yellow-400"
    } else {
        "border-red-400"
    }
}
