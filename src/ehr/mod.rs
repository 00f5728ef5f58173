mod requests;
mod responses;

use crate::{
    database::{assert, get_db_conn},
    events::{AppEvent, EventBus},
    models::{
        appointments::Appointment,
        exam_records::ExamRecord,
        patients::Patient,
        prescriptions::{Prescription, PrescriptionItem},
    },
    DbPool,
};
use actix_web::{post, web, HttpResponse, Responder};
use anyhow::{bail, Context};
use diesel::prelude::*;

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(search).service(history);
}

crate::post_funcs! {
    (search, "/search", SearchRequest, SearchResponse),
    (history, "/history", HistoryRequest, HistoryResponse),
}

fn to_item(data: Patient) -> PatientItem {
    PatientItem {
        id: data.id,
        name: data.name,
        national_id: data.national_id,
        gender: data.gender,
        telephone: data.telephone,
        address: data.address,
    }
}

async fn search_impl(
    pool: web::Data<DbPool>,
    events: web::Data<EventBus>,
    info: web::Json<SearchRequest>,
) -> anyhow::Result<SearchResponse> {
    use crate::schema::patients;

    let info = info.into_inner();
    if info.name.trim().is_empty() {
        bail!("Vui lòng nhập tên bệnh nhân");
    }

    let conn = get_db_conn(&pool)?;
    let matches = web::block(move || match info.national_id.as_deref() {
        Some(nid) if !nid.is_empty() => patients::table
            .filter(patients::name.eq(&info.name))
            .filter(patients::national_id.eq(nid))
            .order(patients::name.asc())
            .get_results::<Patient>(&conn),
        _ => {
            let pattern = crate::utils::get_str_pattern(&info.name);
            patients::table
                .filter(patients::name.like(pattern))
                .order(patients::name.asc())
                .get_results::<Patient>(&conn)
        }
    })
    .await
    .context("Lỗi cơ sở dữ liệu")?;

    // A single partial hit counts as an exact one; several become a
    // disambiguation list; none is a normal not-found answer.
    let response = match matches.len() {
        0 => SearchResponse {
            success: true,
            err: "".to_string(),
            patient: None,
            candidates: Vec::new(),
            message: "Không tìm thấy bệnh nhân".to_string(),
        },
        1 => {
            let patient = matches.into_iter().next().map(to_item);
            if let Some(patient) = &patient {
                events.emit(AppEvent::PatientSelected {
                    patient_id: patient.id,
                });
            }
            SearchResponse {
                success: true,
                err: "".to_string(),
                patient,
                candidates: Vec::new(),
                message: "".to_string(),
            }
        }
        _ => SearchResponse {
            success: true,
            err: "".to_string(),
            patient: None,
            candidates: matches.into_iter().map(to_item).collect(),
            message: "".to_string(),
        },
    };

    Ok(response)
}

// Newest visit first; per visit the latest exam record, then every
// prescription with its line items. Sequential queries are fine at
// single-clinic volume.
async fn history_impl(
    pool: web::Data<DbPool>,
    _events: web::Data<EventBus>,
    info: web::Json<HistoryRequest>,
) -> anyhow::Result<HistoryResponse> {
    use crate::schema::{appointments, exam_records, patients, prescription_items, prescriptions};

    let info = info.into_inner();
    assert::assert_patient(&pool, info.patient_id).await?;

    let conn = get_db_conn(&pool)?;
    let patient_id = info.patient_id;
    let (patient_name, visits) = web::block(move || {
        let patient = patients::table
            .filter(patients::id.eq(patient_id))
            .get_result::<Patient>(&conn)
            .context("Lỗi cơ sở dữ liệu")?;

        let appos = appointments::table
            .filter(appointments::patient_id.eq(patient_id))
            .order(appointments::scheduled_time.desc())
            .get_results::<Appointment>(&conn)
            .context("Lỗi cơ sở dữ liệu")?;

        let mut visits = Vec::with_capacity(appos.len());
        for appo in appos {
            let exam = exam_records::table
                .filter(exam_records::appointment_id.eq(appo.id))
                .order(exam_records::time.desc())
                .limit(1)
                .get_result::<ExamRecord>(&conn)
                .optional()
                .context("Lỗi cơ sở dữ liệu")?
                .map(|data| ExamItem {
                    symptoms: data.symptoms,
                    diagnosis: data.diagnosis,
                    conclusion: data.conclusion,
                    time: crate::utils::format_time_str(&data.time),
                });

            let pres = prescriptions::table
                .filter(prescriptions::appointment_id.eq(appo.id))
                .order(prescriptions::time.desc())
                .get_results::<Prescription>(&conn)
                .context("Lỗi cơ sở dữ liệu")?;
            let mut groups = Vec::with_capacity(pres.len());
            for prescription in pres {
                let medicines = prescription_items::table
                    .filter(prescription_items::prescription_id.eq(prescription.id))
                    .get_results::<PrescriptionItem>(&conn)
                    .context("Lỗi cơ sở dữ liệu")?
                    .into_iter()
                    .map(|item| MedicineItem {
                        medicine: item.medicine,
                        quantity: item.quantity,
                        dosage: item.dosage,
                    })
                    .collect();
                groups.push(PrescriptionGroup {
                    id: prescription.id,
                    doctor_name: prescription.doctor_name,
                    note: prescription.note,
                    time: crate::utils::format_time_str(&prescription.time),
                    medicines,
                });
            }

            visits.push(VisitItem {
                id: appo.id,
                scheduled_time: appo.scheduled_time,
                doctor_name: appo.doctor_name,
                visit_type: appo.visit_type,
                status: appo.status,
                exam,
                prescriptions: groups,
            });
        }

        Ok::<_, anyhow::Error>((patient.name, visits))
    })
    .await?;

    Ok(HistoryResponse {
        success: true,
        err: "".to_string(),
        patient_name,
        visits,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::models::{
        appointments::{NewAppointment, APPOINT_STATUS_DONE},
        exam_records::NewExamRecord,
        patients::NewPatient,
        prescriptions::{NewPrescription, NewPrescriptionItem},
    };
    use crate::schema::{appointments, exam_records, patients, prescription_items, prescriptions};
    use chrono::{NaiveDate, Utc};

    fn setup() -> (web::Data<DbPool>, web::Data<EventBus>) {
        (
            web::Data::new(crate::database::test_pool()),
            web::Data::new(EventBus::new()),
        )
    }

    fn seed_patient(pool: &web::Data<DbPool>, name: &str, national_id: &str) -> i64 {
        let conn = pool.get().unwrap();
        diesel::insert_into(patients::table)
            .values(NewPatient {
                name: name.to_string(),
                national_id: national_id.to_string(),
                gender: "Nam".to_string(),
                birthday: None,
                telephone: "".to_string(),
                address: "".to_string(),
            })
            .execute(&conn)
            .unwrap();
        crate::database::last_insert_rowid(&conn).unwrap()
    }

    #[actix_rt::test]
    async fn a_single_partial_match_resolves_directly() {
        let (pool, events) = setup();
        let pid = seed_patient(&pool, "Nguyen Van An", "0123456789");
        seed_patient(&pool, "Tran Thi Binh", "0987654321");

        let selected = Arc::new(Mutex::new(None));
        let sink = selected.clone();
        events.subscribe(move |event| {
            if let AppEvent::PatientSelected { patient_id } = event {
                *sink.lock().unwrap() = Some(*patient_id);
            }
        });

        let res = search_impl(
            pool,
            events,
            web::Json(SearchRequest {
                name: "Nguyen".to_string(),
                national_id: None,
            }),
        )
        .await
        .unwrap();

        let patient = res.patient.expect("resolved");
        assert_eq!(patient.id, pid);
        assert!(res.candidates.is_empty());
        assert_eq!(*selected.lock().unwrap(), Some(pid));
    }

    #[actix_rt::test]
    async fn zero_matches_yield_a_not_found_message() {
        let (pool, events) = setup();
        seed_patient(&pool, "Tran Thi Binh", "0987654321");

        let res = search_impl(
            pool,
            events,
            web::Json(SearchRequest {
                name: "Nguyen".to_string(),
                national_id: None,
            }),
        )
        .await
        .unwrap();

        assert!(res.success);
        assert!(res.patient.is_none());
        assert!(res.candidates.is_empty());
        assert_eq!(res.message, "Không tìm thấy bệnh nhân");
    }

    #[actix_rt::test]
    async fn multiple_matches_yield_a_disambiguation_list() {
        let (pool, events) = setup();
        seed_patient(&pool, "Nguyen Van An", "0123456789");
        seed_patient(&pool, "Nguyen Thi Chau", "0111111111");

        let res = search_impl(
            pool,
            events,
            web::Json(SearchRequest {
                name: "Nguyen".to_string(),
                national_id: None,
            }),
        )
        .await
        .unwrap();

        assert!(res.patient.is_none());
        assert_eq!(res.candidates.len(), 2);
    }

    #[actix_rt::test]
    async fn exact_search_uses_name_and_national_id_together() {
        let (pool, events) = setup();
        seed_patient(&pool, "Nguyen Van An", "0123456789");
        seed_patient(&pool, "Nguyen Van An", "0999999999");

        let res = search_impl(
            pool,
            events,
            web::Json(SearchRequest {
                name: "Nguyen Van An".to_string(),
                national_id: Some("0123456789".to_string()),
            }),
        )
        .await
        .unwrap();

        let patient = res.patient.expect("resolved");
        assert_eq!(patient.national_id, "0123456789");
    }

    #[actix_rt::test]
    async fn history_assembles_visits_with_exams_and_prescriptions() {
        let (pool, events) = setup();
        let pid = seed_patient(&pool, "Nguyen Van An", "0123456789");

        let conn = pool.get().unwrap();
        diesel::insert_into(appointments::table)
            .values(NewAppointment {
                patient_name: "Nguyen Van An".to_string(),
                patient_id: Some(pid),
                scheduled_time: "2024-12-01T09:00".to_string(),
                doctor_name: "Dr. X".to_string(),
                visit_type: "Tái khám".to_string(),
                note: "".to_string(),
                status: APPOINT_STATUS_DONE.to_string(),
                telephone: None,
                address: None,
                created_at: Utc::now().naive_utc(),
            })
            .execute(&conn)
            .unwrap();
        let visit_id = crate::database::last_insert_rowid(&conn).unwrap();

        let exam_time = NaiveDate::from_ymd(2024, 12, 1).and_hms(9, 30, 0);
        diesel::insert_into(exam_records::table)
            .values(NewExamRecord {
                appointment_id: visit_id,
                symptoms: "ho khan".to_string(),
                diagnosis: "viêm họng".to_string(),
                conclusion: "điều trị ngoại trú".to_string(),
                time: exam_time,
            })
            .execute(&conn)
            .unwrap();

        diesel::insert_into(prescriptions::table)
            .values(NewPrescription {
                appointment_id: visit_id,
                doctor_name: "Dr. X".to_string(),
                note: "uống sau ăn".to_string(),
                time: exam_time,
            })
            .execute(&conn)
            .unwrap();
        let prescription_id = crate::database::last_insert_rowid(&conn).unwrap();
        diesel::insert_into(prescription_items::table)
            .values(vec![
                NewPrescriptionItem {
                    prescription_id,
                    medicine: "Paracetamol".to_string(),
                    quantity: 10,
                    dosage: "2 viên/ngày".to_string(),
                },
                NewPrescriptionItem {
                    prescription_id,
                    medicine: "Amoxicillin".to_string(),
                    quantity: 14,
                    dosage: "2 viên/ngày".to_string(),
                },
            ]
            .as_slice())
            .execute(&*conn)
            .unwrap();
        drop(conn);

        let res = history_impl(
            pool,
            events,
            web::Json(HistoryRequest { patient_id: pid }),
        )
        .await
        .unwrap();

        assert_eq!(res.patient_name, "Nguyen Van An");
        assert_eq!(res.visits.len(), 1);
        let visit = &res.visits[0];
        assert_eq!(visit.exam.as_ref().unwrap().diagnosis, "viêm họng");
        assert_eq!(visit.prescriptions.len(), 1);
        assert_eq!(visit.prescriptions[0].medicines.len(), 2);
    }

    #[actix_rt::test]
    async fn history_for_an_unknown_patient_is_an_error() {
        let (pool, events) = setup();
        let res = history_impl(pool, events, web::Json(HistoryRequest { patient_id: 42 })).await;
        assert!(res.is_err());
    }
}
