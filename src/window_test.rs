use chrono::{Duration, Utc};

use crate::window::time_window;

fn look_behind() -> Duration {
    Duration::minutes(60)
}

#[test]
fn fresh_store_falls_back_to_look_behind() {
    let req = Utc::now();

    let (start, end) = time_window(look_behind(), req, None, req);

    assert_eq!(start, req - look_behind());
    assert_eq!(end, req);
}

#[test]
fn cursor_too_close_to_the_end_widens_to_look_behind() {
    let req = Utc::now();

    let (start, end) = time_window(look_behind(), req, Some(req - Duration::minutes(30)), req);

    assert_eq!(start, req - look_behind());
    assert_eq!(end, req);
}

#[test]
fn cursor_ahead_of_the_end_falls_back_to_look_behind() {
    let req = Utc::now();

    let (start, end) = time_window(look_behind(), req, Some(req + Duration::hours(1)), req);

    assert_eq!(start, req - look_behind());
    assert_eq!(end, req);
}

#[test]
fn equal_bounds_reset_the_end_to_the_request_time() {
    let req = Utc::now();
    let cursor = req - Duration::hours(3);

    let (start, end) = time_window(look_behind(), req, Some(cursor), cursor);

    assert_eq!(start, cursor);
    assert_eq!(end, req);
}

#[test]
fn cursor_beyond_retention_pins_the_window_to_seven_days() {
    let req = Utc::now();

    let (start, end) = time_window(look_behind(), req, Some(req - Duration::days(10)), req);

    assert_eq!(start, req - Duration::days(7));
    assert_eq!(end, start + Duration::hours(24));
}

#[test]
fn wide_window_is_cut_to_one_day() {
    let req = Utc::now();
    let cursor = req - Duration::hours(30);

    let (start, end) = time_window(look_behind(), req, Some(cursor), req);

    assert_eq!(start, cursor);
    assert_eq!(end, cursor + Duration::hours(24));
}

#[test]
fn end_past_the_request_time_is_clamped() {
    let req = Utc::now();

    let (start, end) = time_window(
        look_behind(),
        req,
        Some(req - Duration::hours(2)),
        req + Duration::hours(1),
    );

    assert_eq!(start, req - Duration::hours(2));
    assert_eq!(end, req);
}

#[test]
fn applying_the_policy_to_its_own_output_is_a_fixed_point() {
    let req = Utc::now();
    let inputs = [
        (None, req),
        (Some(req - Duration::minutes(30)), req),
        (Some(req - Duration::days(10)), req),
        (Some(req - Duration::hours(30)), req),
        (Some(req - Duration::hours(3)), req - Duration::hours(3)),
    ];

    for (start, end) in inputs {
        let first = time_window(look_behind(), req, start, end);
        let second = time_window(look_behind(), req, Some(first.0), first.1);
        assert_eq!(first, second, "start={start:?} end={end}");
    }
}

#[test]
fn produced_windows_respect_the_api_constraints() {
    let req = Utc::now();
    let inputs = [
        (None, req),
        (Some(req - Duration::minutes(1)), req),
        (Some(req - Duration::minutes(30)), req),
        (Some(req - Duration::hours(3)), req),
        (Some(req - Duration::hours(30)), req),
        (Some(req - Duration::days(6)), req),
        (Some(req - Duration::days(10)), req),
        (Some(req - Duration::days(30)), req),
        (Some(req + Duration::hours(5)), req),
        (Some(req - Duration::hours(2)), req - Duration::hours(2)),
    ];

    for (start, end) in inputs {
        let (start_out, end_out) = time_window(look_behind(), req, start, end);
        assert!(start_out < end_out, "start={start:?} end={end}");
        assert!(end_out - start_out <= Duration::hours(24), "start={start:?} end={end}");
        assert!(start_out >= req - Duration::days(7), "start={start:?} end={end}");
        assert!(end_out <= req, "start={start:?} end={end}");
    }
}

#[test]
fn pagination_walk_reaches_the_request_time() {
    let req = Utc::now();
    let mut cursor = Some(req - Duration::days(10));
    let mut end = req;
    let mut rounds = 0;

    loop {
        let (start, new_end) = time_window(look_behind(), req, cursor, end);
        assert!(start < new_end);
        assert!(new_end - start <= Duration::hours(24));

        // the lister stores the end bound and re-reads it as the cursor
        cursor = Some(new_end);
        end = new_end;
        rounds += 1;
        assert!(rounds <= 16, "walk must terminate");
        if new_end >= req {
            break;
        }
    }
    assert_eq!(rounds, 7);
}
