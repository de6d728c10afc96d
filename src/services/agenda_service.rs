// src/services/agenda_service.rs
//
// Alocador de slots da agenda: grade fixa de horários de 1 hora
// (manhã 9-12, tarde 17-21) e detecção de conflitos na admissão.

use chrono::{NaiveDate, NaiveTime};
use sqlx::{Executor, Postgres};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ReservaRepository,
    models::reservas::{DisponibilidadResponse, Reserva, SlotInfo},
};

// Grade fixa em minutos desde a meia-noite: 09:00-12:00 e 17:00-21:00.
// É o ritmo real do negócio; não existe slot fora dessas marcas.
const GRILLA_MIN: [i32; 9] = [540, 600, 660, 720, 1020, 1080, 1140, 1200, 1260];

pub const INTERVALO_MIN: i32 = 60;

fn minutos(t: NaiveTime) -> i32 {
    use chrono::Timelike;
    (t.num_seconds_from_midnight() / 60) as i32
}

fn hhmm(min: i32) -> String {
    let m = min.rem_euclid(24 * 60);
    format!("{:02}:{:02}", m / 60, m % 60)
}

/// Blocos de 1 hora necessários para cobrir uma duração em minutos.
pub fn bloques_necesarios(duracion_min: i32) -> i32 {
    std::cmp::max(1, (duracion_min + INTERVALO_MIN - 1) / INTERVALO_MIN)
}

/// Marcas horárias ocupadas pelas reservas ativas de um dia.
/// Cada reserva ocupa `ceil(duracion/60)` marcas consecutivas a partir do
/// seu horário de início.
pub fn horas_ocupadas(reservas: &[(NaiveTime, i32)]) -> BTreeSet<i32> {
    let mut ocupados = BTreeSet::new();
    for (inicio, duracion) in reservas {
        let bloques = bloques_necesarios(*duracion);
        let base = minutos(*inicio);
        for i in 0..bloques {
            ocupados.insert(base + i * INTERVALO_MIN);
        }
    }
    ocupados
}

/// Calcula a disponibilidade da grade completa. Um slot só é livre se ele
/// mesmo estiver livre E, quando a duração pede mais de um bloco, todas as
/// marcas seguintes existirem na grade e estiverem livres. Pedir 3 horas a
/// partir do último slot da tarde nunca é possível: as marcas seguintes
/// não existem.
pub fn calcular_slots(ocupados: &BTreeSet<i32>, duracion_min: i32) -> Vec<SlotInfo> {
    let bloques = bloques_necesarios(duracion_min);

    GRILLA_MIN
        .iter()
        .map(|&marca| {
            let mut disponible = !ocupados.contains(&marca);

            if disponible && bloques > 1 {
                for i in 1..bloques {
                    let siguiente = marca + i * INTERVALO_MIN;
                    if ocupados.contains(&siguiente) || !GRILLA_MIN.contains(&siguiente) {
                        disponible = false;
                        break;
                    }
                }
            }

            SlotInfo {
                hora: hhmm(marca),
                disponible,
            }
        })
        .collect()
}

/// Checagem de admissão: intervalos semiabertos `[inicio, inicio+dur)`.
/// Encostar (fim == início da seguinte) não é conflito.
pub fn hay_conflicto(inicio: NaiveTime, duracion_min: i32, existentes: &[(NaiveTime, i32)]) -> bool {
    let ini = minutos(inicio);
    let fin = ini + duracion_min;

    existentes.iter().any(|(r_inicio, r_duracion)| {
        let r_ini = minutos(*r_inicio);
        let r_fin = r_ini + r_duracion;
        ini < r_fin && fin > r_ini
    })
}

fn ocupacion(reservas: &[Reserva]) -> Vec<(NaiveTime, i32)> {
    reservas
        .iter()
        .map(|r| (r.horario, if r.duracion_total > 0 { r.duracion_total } else { INTERVALO_MIN }))
        .collect()
}

#[derive(Clone)]
pub struct AgendaService {
    reserva_repo: ReservaRepository,
}

impl AgendaService {
    pub fn new(reserva_repo: ReservaRepository) -> Self {
        Self { reserva_repo }
    }

    /// Consulta de disponibilidade para um barbero num dia.
    pub async fn disponibilidad(
        &self,
        barbero_id: Uuid,
        fecha: NaiveDate,
        duracion_min: Option<i32>,
    ) -> Result<DisponibilidadResponse, AppError> {
        let duracion = duracion_min.unwrap_or(INTERVALO_MIN);
        if duracion <= 0 {
            return Err(AppError::InvalidInput("Duración inválida".to_string()));
        }

        let reservas = self
            .reserva_repo
            .activas_por_barbero_fecha(barbero_id, fecha)
            .await?;

        let ocupados = horas_ocupadas(&ocupacion(&reservas));
        let slots = calcular_slots(&ocupados, duracion);

        Ok(DisponibilidadResponse {
            fecha,
            barbero: barbero_id,
            intervalo_min: INTERVALO_MIN,
            duracion_min_requerida: duracion,
            slots,
            horarios_ocupados: ocupados.iter().map(|&m| hhmm(m)).collect(),
        })
    }

    /// Admissão de uma nova reserva. Roda DENTRO da transação de criação,
    /// com lock nas reservas do dia (FOR UPDATE): ou a checagem e o insert
    /// entram juntos, ou nada entra.
    pub async fn admitir<'e, E>(
        &self,
        executor: E,
        barbero_id: Uuid,
        fecha: NaiveDate,
        horario: NaiveTime,
        duracion_min: i32,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let existentes = self
            .reserva_repo
            .activas_para_admision(executor, barbero_id, fecha)
            .await?;

        if hay_conflicto(horario, duracion_min, &ocupacion(&existentes)) {
            return Err(AppError::SlotConflict(hhmm(minutos(horario))));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn slot<'a>(slots: &'a [SlotInfo], hora: &str) -> &'a SlotInfo {
        slots.iter().find(|s| s.hora == hora).unwrap()
    }

    #[test]
    fn grilla_vacia_todo_disponible() {
        let slots = calcular_slots(&BTreeSet::new(), 60);
        assert_eq!(slots.len(), 9);
        assert!(slots.iter().all(|s| s.disponible));
        assert_eq!(slots[0].hora, "09:00");
        assert_eq!(slots[8].hora, "21:00");
    }

    #[test]
    fn reserva_de_una_hora_ocupa_una_marca() {
        let ocupados = horas_ocupadas(&[(t(10, 0), 60)]);
        let slots = calcular_slots(&ocupados, 60);
        assert!(!slot(&slots, "10:00").disponible);
        assert!(slot(&slots, "09:00").disponible);
        assert!(slot(&slots, "11:00").disponible);
    }

    #[test]
    fn duracion_de_90_ocupa_dos_marcas() {
        // ceil(90/60) = 2 bloques
        let ocupados = horas_ocupadas(&[(t(9, 0), 90)]);
        let slots = calcular_slots(&ocupados, 60);
        assert!(!slot(&slots, "09:00").disponible);
        assert!(!slot(&slots, "10:00").disponible);
        assert!(slot(&slots, "11:00").disponible);
    }

    #[test]
    fn pedido_multibloque_necesita_marcas_consecutivas_libres() {
        // 11:00 ocupado: un pedido de 2 horas entra a las 09:00
        // (09:00+10:00 libres) pero no a las 10:00 ni a las 11:00.
        let ocupados = horas_ocupadas(&[(t(11, 0), 60)]);
        let slots = calcular_slots(&ocupados, 120);
        assert!(slot(&slots, "09:00").disponible);
        assert!(!slot(&slots, "10:00").disponible);
        assert!(!slot(&slots, "11:00").disponible);
    }

    #[test]
    fn las_12_no_encadena_con_la_tarde() {
        // 12:00 existe pero 13:00 no está en la grilla: un pedido de
        // 2 horas a las 12:00 es imposible aunque la tarde esté libre.
        let slots = calcular_slots(&BTreeSet::new(), 120);
        assert!(!slot(&slots, "12:00").disponible);
        assert!(slot(&slots, "11:00").disponible);
    }

    #[test]
    fn tres_horas_desde_las_20_imposible() {
        // 20:00 con 180 min exige 21:00 y 22:00; 22:00 no existe en la grilla.
        let slots = calcular_slots(&BTreeSet::new(), 180);
        assert!(!slot(&slots, "20:00").disponible);
        assert!(!slot(&slots, "21:00").disponible);
        assert!(slot(&slots, "19:00").disponible);
    }

    #[test]
    fn cancelar_libera_el_slot() {
        // La ocupación se computa solo sobre reservas activas: al sacar
        // la reserva de las 10:00 del conjunto, la marca vuelve a estar libre.
        let con_reserva = horas_ocupadas(&[(t(10, 0), 60)]);
        assert!(!calcular_slots(&con_reserva, 60)[1].disponible);

        let sin_reserva = horas_ocupadas(&[]);
        assert!(calcular_slots(&sin_reserva, 60)[1].disponible);
    }

    #[test]
    fn conflicto_intervalos_semiabiertos() {
        let existentes = vec![(t(10, 0), 60)];

        // Solapamiento total y parcial
        assert!(hay_conflicto(t(10, 0), 60, &existentes));
        assert!(hay_conflicto(t(9, 30), 60, &existentes));
        assert!(hay_conflicto(t(10, 30), 90, &existentes));

        // Espalda con espalda: permitido
        assert!(!hay_conflicto(t(9, 0), 60, &existentes));
        assert!(!hay_conflicto(t(11, 0), 60, &existentes));
    }

    #[test]
    fn admision_nunca_rechaza_intervalo_libre() {
        // Conjunto de reservas activas sin solaparse entre sí
        let existentes = vec![(t(9, 0), 60), (t(11, 0), 120), (t(17, 0), 60)];

        // Huecos genuinos
        assert!(!hay_conflicto(t(10, 0), 60, &existentes));
        assert!(!hay_conflicto(t(18, 0), 120, &existentes));
        assert!(!hay_conflicto(t(13, 0), 60, &existentes));
    }

    #[test]
    fn reserva_fuera_de_grilla_bloquea_por_intervalo() {
        // Una reserva que empieza a las 10:30 no coincide con ninguna
        // marca exacta, pero la admisión por intervalos sí la ve.
        let existentes = vec![(t(10, 30), 60)];
        assert!(hay_conflicto(t(10, 0), 60, &existentes));
        assert!(hay_conflicto(t(11, 0), 30, &existentes));
        assert!(!hay_conflicto(t(11, 30), 60, &existentes));
    }

    #[test]
    fn bloques_redondea_hacia_arriba() {
        assert_eq!(bloques_necesarios(0), 1);
        assert_eq!(bloques_necesarios(30), 1);
        assert_eq!(bloques_necesarios(60), 1);
        assert_eq!(bloques_necesarios(61), 2);
        assert_eq!(bloques_necesarios(120), 2);
        assert_eq!(bloques_necesarios(180), 3);
    }

    #[test]
    fn horarios_ocupados_formato_hhmm() {
        let ocupados = horas_ocupadas(&[(t(9, 0), 120)]);
        let etiquetas: Vec<String> = ocupados.iter().map(|&m| hhmm(m)).collect();
        assert_eq!(etiquetas, vec!["09:00", "10:00"]);
    }
}
